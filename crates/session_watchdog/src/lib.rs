//! session_watchdog - inactivity detection for tutoring sessions
//!
//! Provides an explicit cancellable timer and the watchdog that uses it to
//! report idle periods back to the session controller.

pub mod activity;
pub mod timer;
pub mod watchdog;

pub use activity::ActivitySignal;
pub use timer::CancellableTimer;
pub use watchdog::{InactivityWatchdog, WatchdogExpiry};
