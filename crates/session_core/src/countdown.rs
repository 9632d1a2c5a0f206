//! Countdown presentation for the session timer

use serde::{Deserialize, Serialize};

use crate::clock::SessionClock;
use crate::messages::{COUNTDOWN_EXPIRED_LABEL, COUNTDOWN_PREFIX};

/// Below this many seconds the countdown switches to the warning phase.
pub const WARNING_THRESHOLD_SECONDS: i64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownPhase {
    Normal,
    Warning,
    Expired,
}

impl CountdownPhase {
    pub fn for_remaining(remaining_seconds: i64) -> Self {
        if remaining_seconds <= 0 {
            CountdownPhase::Expired
        } else if remaining_seconds < WARNING_THRESHOLD_SECONDS {
            CountdownPhase::Warning
        } else {
            CountdownPhase::Normal
        }
    }

    /// Background colour of the timer badge
    pub fn color(self) -> &'static str {
        match self {
            CountdownPhase::Normal => "#4285f4",
            CountdownPhase::Warning => "#f39c12",
            CountdownPhase::Expired => "#e74c3c",
        }
    }
}

/// Snapshot of the countdown at one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub remaining_seconds: i64,
    pub phase: CountdownPhase,
    pub label: String,
}

impl Countdown {
    pub fn at(clock: &SessionClock, now_ms: i64) -> Self {
        let remaining = clock.remaining_seconds(now_ms);
        // A zero budget is expired from the start, even with a skewed clock.
        let remaining = if clock.budget_seconds() == 0 {
            remaining.min(0)
        } else {
            remaining
        };
        Self::from_remaining(remaining)
    }

    pub fn from_remaining(remaining_seconds: i64) -> Self {
        let phase = CountdownPhase::for_remaining(remaining_seconds);
        let label = match phase {
            CountdownPhase::Expired => COUNTDOWN_EXPIRED_LABEL.to_string(),
            _ => format!(
                "{}: {:02}:{:02}",
                COUNTDOWN_PREFIX,
                remaining_seconds / 60,
                remaining_seconds % 60
            ),
        };
        Self {
            remaining_seconds,
            phase,
            label,
        }
    }

    /// Remaining seconds clamped at zero for display
    pub fn display_seconds(&self) -> i64 {
        self.remaining_seconds.max(0)
    }
}
