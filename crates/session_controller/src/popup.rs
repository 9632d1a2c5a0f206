//! End-of-session popup

use serde::{Deserialize, Serialize};

use session_core::messages::{
    self, ACKNOWLEDGE_LABEL, BACK_LABEL, CONFIRM_LABEL, SUBMISSION_MESSAGE,
};
use session_core::GateState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupKind {
    /// Budget not used up yet; keep studying.
    Waiting,
    /// Budget used up; the submission resource can be opened.
    Submission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupAction {
    /// Dismiss the waiting popup.
    Acknowledge,
    /// Open the submission resource, then dismiss.
    Confirm,
    /// Dismiss the submission popup without side effects.
    Back,
}

impl PopupAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Acknowledge => ACKNOWLEDGE_LABEL,
            Self::Confirm => CONFIRM_LABEL,
            Self::Back => BACK_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Popup {
    pub kind: PopupKind,
    pub message: String,
    pub actions: Vec<PopupAction>,
}

impl Popup {
    /// Build the popup matching a freshly evaluated gate.
    pub fn for_gate(gate: GateState, budget_seconds: u64) -> Self {
        match gate {
            GateState::Locked => Self {
                kind: PopupKind::Waiting,
                message: messages::waiting_message(budget_seconds),
                actions: vec![PopupAction::Acknowledge],
            },
            GateState::Open => Self {
                kind: PopupKind::Submission,
                message: SUBMISSION_MESSAGE.to_string(),
                actions: vec![PopupAction::Confirm, PopupAction::Back],
            },
        }
    }

    pub fn offers(&self, action: PopupAction) -> bool {
        self.actions.contains(&action)
    }
}
