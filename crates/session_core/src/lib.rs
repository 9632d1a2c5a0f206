//! # Session Core
//!
//! Persistent session clock, countdown presentation and the submission gate
//! for a timed tutoring session, plus the configuration shared by the
//! other session crates.

pub mod clock;
pub mod config;
pub mod countdown;
pub mod error;
pub mod gate;
pub mod messages;
pub mod paths;
pub mod storage;

// Re-exports
pub use clock::{
    remaining_seconds, session_key, ManualWallClock, SessionClock, SystemWallClock, WallClock,
};
pub use config::Config;
pub use countdown::{Countdown, CountdownPhase};
pub use error::{Result, SessionError};
pub use gate::{GateState, SubmissionGate};
pub use storage::{ClockStorage, FileClockStorage, MemoryClockStorage};
