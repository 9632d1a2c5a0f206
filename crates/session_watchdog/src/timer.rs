//! Cancellable one-shot timer on the tokio runtime

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A single deferred callback that can be cancelled or replaced.
///
/// `schedule` aborts any pending callback before spawning the new one, so at
/// most one callback is ever pending.
#[derive(Debug, Default)]
pub struct CancellableTimer {
    handle: Option<JoinHandle<()>>,
}

impl CancellableTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the pending callback (if any) and run `on_fire` after `delay`.
    pub fn schedule<F>(&mut self, delay: Duration, on_fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire.await;
        }));
    }

    /// Cancel the pending callback. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for CancellableTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
