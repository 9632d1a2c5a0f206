//! Inactivity watchdog
//!
//! Tracks the time since the last qualifying activity. When the threshold
//! passes without activity the watchdog reports a [`WatchdogExpiry`] through
//! its notifier; the owner answers with a nudge and calls [`rearm`] once the
//! nudge settles.
//!
//! [`rearm`]: InactivityWatchdog::rearm

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::time::Instant;

use crate::activity::ActivitySignal;
use crate::timer::CancellableTimer;

/// Reported when the inactivity threshold passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogExpiry {
    /// Generation of the arming that produced this expiry.
    pub generation: u64,
}

pub type ExpiryNotifier = Arc<dyn Fn(WatchdogExpiry) + Send + Sync>;

pub struct InactivityWatchdog {
    threshold: Duration,
    timer: CancellableTimer,
    notify: ExpiryNotifier,
    generation: u64,
    deadline: Option<Instant>,
}

impl InactivityWatchdog {
    pub fn new(threshold: Duration, notify: ExpiryNotifier) -> Self {
        Self {
            threshold,
            timer: CancellableTimer::new(),
            notify,
            generation: 0,
            deadline: None,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Start watching. Equivalent to [`rearm`](Self::rearm).
    pub fn arm(&mut self) {
        self.rearm();
    }

    /// Cancel any pending expiry and schedule a new one a full threshold
    /// from now. The last deadline set wins.
    pub fn rearm(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let notify = Arc::clone(&self.notify);

        self.deadline = Some(Instant::now() + self.threshold);
        self.timer.schedule(self.threshold, async move {
            notify(WatchdogExpiry { generation });
        });
        debug!(
            "Inactivity watchdog armed (generation {}, {:?})",
            generation, self.threshold
        );
    }

    /// Reset the watchdog for a qualifying activity signal.
    pub fn record_activity(&mut self, signal: ActivitySignal) {
        debug!("Activity: {}", signal);
        self.rearm();
    }

    /// Whether `expiry` belongs to the current arming.
    ///
    /// An expiry can already be queued when a rearm happens; such an expiry
    /// is stale and must be dropped.
    pub fn is_current(&self, expiry: &WatchdogExpiry) -> bool {
        expiry.generation == self.generation
    }

    /// Mark the current deadline as consumed after its expiry was handled.
    pub fn mark_fired(&mut self, expiry: &WatchdogExpiry) {
        if self.is_current(expiry) {
            self.deadline = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Time until the pending expiry, if one is pending
    pub fn remaining(&self) -> Option<Duration> {
        if !self.is_pending() {
            return None;
        }
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Stop watching. Only used when the session shuts down.
    pub fn disarm(&mut self) {
        self.generation += 1;
        self.deadline = None;
        self.timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording() -> (ExpiryNotifier, Arc<Mutex<Vec<WatchdogExpiry>>>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let notify: ExpiryNotifier =
            Arc::new(move |expiry: WatchdogExpiry| sink.lock().unwrap().push(expiry));
        (notify, fired)
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expires_after_threshold() {
        let (notify, fired) = recording();
        let mut watchdog = InactivityWatchdog::new(Duration::from_millis(300_000), notify);
        watchdog.arm();

        tokio::time::advance(Duration::from_millis(299_999)).await;
        settle().await;
        assert!(fired.lock().unwrap().is_empty());

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        let fired = fired.lock().unwrap();
        assert_eq!(fired.len(), 1);
        assert!(watchdog.is_current(&fired[0]));
    }

    #[tokio::test(start_paused = true)]
    async fn activity_resets_to_full_threshold() {
        let (notify, fired) = recording();
        let mut watchdog = InactivityWatchdog::new(Duration::from_millis(300_000), notify);
        watchdog.arm();

        tokio::time::advance(Duration::from_millis(290_000)).await;
        settle().await;
        assert_eq!(watchdog.remaining(), Some(Duration::from_millis(10_000)));

        watchdog.record_activity(ActivitySignal::PointerMoved);
        assert_eq!(watchdog.remaining(), Some(Duration::from_millis(300_000)));

        // The original deadline passes without an expiry.
        tokio::time::advance(Duration::from_millis(10_000)).await;
        settle().await;
        assert!(fired.lock().unwrap().is_empty());

        tokio::time::advance(Duration::from_millis(290_000)).await;
        settle().await;
        assert_eq!(fired.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_expiry_is_detected() {
        let (notify, _fired) = recording();
        let mut watchdog = InactivityWatchdog::new(Duration::from_secs(1), notify);
        watchdog.arm();
        let stale = WatchdogExpiry {
            generation: watchdog.generation(),
        };

        watchdog.record_activity(ActivitySignal::KeyPressed);
        assert!(!watchdog.is_current(&stale));
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_cancels_pending_expiry() {
        let (notify, fired) = recording();
        let mut watchdog = InactivityWatchdog::new(Duration::from_secs(1), notify);
        watchdog.arm();
        watchdog.disarm();

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert!(fired.lock().unwrap().is_empty());
        assert_eq!(watchdog.remaining(), None);
    }
}
