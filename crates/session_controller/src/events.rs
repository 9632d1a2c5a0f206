//! Session events - everything the controller reacts to

use exchange_relay::{ExchangeKind, ExchangeOutcome};
use session_watchdog::{ActivitySignal, WatchdogExpiry};
use thiserror::Error;

use crate::popup::PopupAction;

/// Events drained by the session controller, one at a time.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    // ========== User Events ==========
    /// Pointer, keyboard or focus activity.
    Activity(ActivitySignal),

    /// The user submitted the message input.
    SubmitMessage(String),

    /// The user asked to finish the session.
    RequestSubmission,

    /// The user picked an action in the open popup.
    ChoosePopupAction(PopupAction),

    // ========== Timer Events ==========
    /// Countdown tick.
    Tick,

    /// The inactivity watchdog ran out.
    WatchdogExpired(WatchdogExpiry),

    // ========== Exchange Events ==========
    /// A backend exchange settled.
    ExchangeSettled {
        kind: ExchangeKind,
        outcome: ExchangeOutcome,
    },

    /// Stop the controller.
    Shutdown,
}

/// Why a submitted message was not sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendRejection {
    #[error("message is empty")]
    Empty,

    #[error("an exchange is still in flight")]
    ExchangeInFlight,

    #[error("send is cooling down")]
    CoolingDown,
}
