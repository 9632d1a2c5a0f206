//! Session clock - persistent start time and remaining-time arithmetic

use std::sync::atomic::{AtomicI64, Ordering};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};
use crate::storage::ClockStorage;

const SESSION_KEY_PREFIX: &str = "chatStartTime_";

/// Source of wall-clock time in milliseconds since the Unix epoch.
pub trait WallClock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven wall clock
#[derive(Debug, Default)]
pub struct ManualWallClock {
    now: AtomicI64,
}

impl ManualWallClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl WallClock for ManualWallClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Storage key scoping the start time to one participant
pub fn session_key(participant_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{participant_id}")
}

/// Seconds left in the budget at `now_ms`.
///
/// Negative values mean the budget is exhausted; they are not extra time.
pub fn remaining_seconds(start_epoch_ms: i64, budget_seconds: u64, now_ms: i64) -> i64 {
    let elapsed_seconds = now_ms.saturating_sub(start_epoch_ms).div_euclid(1000);
    i64::try_from(budget_seconds)
        .unwrap_or(i64::MAX)
        .saturating_sub(elapsed_seconds)
}

/// Start time of a session and its fixed budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    session_key: String,
    start_epoch_ms: i64,
    budget_seconds: u64,
}

impl SessionClock {
    /// Load the start time for `session_key`, capturing `now_ms` on first use.
    ///
    /// The stored value is written once per key and never overwritten.
    pub async fn initialize(
        storage: &dyn ClockStorage,
        session_key: &str,
        budget_seconds: u64,
        now_ms: i64,
    ) -> Result<Self> {
        let start_epoch_ms = match storage.get(session_key).await? {
            Some(stored) => {
                let start = stored.trim().parse::<i64>().map_err(|_| {
                    SessionError::InvalidData(format!(
                        "start time for {session_key} is not a timestamp: {stored:?}"
                    ))
                })?;
                debug!("Resuming session {} started at {}", session_key, start);
                start
            }
            None => {
                storage.set(session_key, &now_ms.to_string()).await?;
                info!("Started session clock {} at {}", session_key, now_ms);
                now_ms
            }
        };

        Ok(Self {
            session_key: session_key.to_string(),
            start_epoch_ms,
            budget_seconds,
        })
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    pub fn start_epoch_ms(&self) -> i64 {
        self.start_epoch_ms
    }

    pub fn budget_seconds(&self) -> u64 {
        self.budget_seconds
    }

    pub fn remaining_seconds(&self, now_ms: i64) -> i64 {
        remaining_seconds(self.start_epoch_ms, self.budget_seconds, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryClockStorage;

    #[test]
    fn test_session_key_is_scoped_by_participant() {
        assert_eq!(session_key("2024001"), "chatStartTime_2024001");
    }

    #[test]
    fn test_remaining_seconds_floors_elapsed() {
        assert_eq!(remaining_seconds(0, 1800, 0), 1800);
        assert_eq!(remaining_seconds(0, 1800, 999), 1800);
        assert_eq!(remaining_seconds(0, 1800, 1000), 1799);
        assert_eq!(remaining_seconds(0, 1800, 1_800_000), 0);
        assert_eq!(remaining_seconds(0, 1800, 1_805_000), -5);
    }

    #[test]
    fn test_remaining_seconds_saturates_for_huge_budgets() {
        assert_eq!(remaining_seconds(0, u64::MAX, 0), i64::MAX);
        assert_eq!(remaining_seconds(0, u64::MAX, 5_000), i64::MAX - 5);
        assert!(remaining_seconds(i64::MAX, 60, i64::MIN) > 0);
    }

    #[test]
    fn test_remaining_seconds_with_clock_behind_start() {
        assert_eq!(remaining_seconds(10_000, 60, 9_500), 61);
    }

    #[tokio::test]
    async fn test_initialize_captures_start_once() {
        let storage = MemoryClockStorage::new();

        let first = SessionClock::initialize(&storage, "chatStartTime_a", 1800, 1_000)
            .await
            .unwrap();
        let second = SessionClock::initialize(&storage, "chatStartTime_a", 1800, 99_000)
            .await
            .unwrap();

        assert_eq!(first.start_epoch_ms(), 1_000);
        assert_eq!(second.start_epoch_ms(), 1_000);
        assert_eq!(storage.write_count(), 1);
        assert_eq!(
            storage.get("chatStartTime_a").await.unwrap().as_deref(),
            Some("1000")
        );
    }

    #[tokio::test]
    async fn test_initialize_keys_are_independent() {
        let storage = MemoryClockStorage::new();

        let a = SessionClock::initialize(&storage, "chatStartTime_a", 60, 1_000)
            .await
            .unwrap();
        let b = SessionClock::initialize(&storage, "chatStartTime_b", 60, 5_000)
            .await
            .unwrap();

        assert_eq!(a.start_epoch_ms(), 1_000);
        assert_eq!(b.start_epoch_ms(), 5_000);
    }

    #[tokio::test]
    async fn test_initialize_rejects_corrupt_value() {
        let storage = MemoryClockStorage::new();
        storage.set("chatStartTime_a", "yesterday").await.unwrap();

        let result = SessionClock::initialize(&storage, "chatStartTime_a", 60, 1_000).await;
        assert!(matches!(result, Err(SessionError::InvalidData(_))));
        assert_eq!(
            storage.get("chatStartTime_a").await.unwrap().as_deref(),
            Some("yesterday")
        );
    }

    #[test]
    fn test_manual_wall_clock_advances() {
        let clock = ManualWallClock::new(100);
        clock.advance_ms(50);
        assert_eq!(clock.now_ms(), 150);
        clock.set(7);
        assert_eq!(clock.now_ms(), 7);
    }
}
