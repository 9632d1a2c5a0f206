//! Submission gate - derived from the session clock, never stored

use serde::{Deserialize, Serialize};

use crate::clock::SessionClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Budget not yet used up; only the waiting message is offered.
    Locked,
    /// Budget used up; end-of-session actions are offered.
    Open,
}

impl GateState {
    pub fn is_open(self) -> bool {
        matches!(self, GateState::Open)
    }
}

pub struct SubmissionGate;

impl SubmissionGate {
    /// Evaluate the gate for `now_ms`. A zero budget is always open.
    pub fn evaluate(clock: &SessionClock, now_ms: i64) -> GateState {
        if clock.budget_seconds() == 0 || clock.remaining_seconds(now_ms) <= 0 {
            GateState::Open
        } else {
            GateState::Locked
        }
    }
}
