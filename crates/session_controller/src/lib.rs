//! session_controller - lifecycle of one tutoring session
//!
//! A single controller task owns every piece of session state and drains one
//! event queue. Timers and backend exchanges run as separate tasks that only
//! post events back, so handlers never interleave.

pub mod controller;
pub mod events;
pub mod loading;
pub mod popup;
pub mod settings;
pub mod transcript;
pub mod view;

pub use controller::{SessionController, SessionHandle};
pub use events::{SendRejection, SessionEvent};
pub use loading::LoadingIndicator;
pub use popup::{Popup, PopupAction, PopupKind};
pub use settings::{Avatar, SessionSettings, SubmissionTarget};
pub use transcript::{Speaker, TranscriptEntry};
pub use view::SessionView;
