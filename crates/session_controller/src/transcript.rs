//! Transcript entries produced by the session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use exchange_relay::ExchangeOutcome;
use session_core::messages;

use crate::settings::Avatar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Ai,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,
}

impl TranscriptEntry {
    fn new(speaker: Speaker, text: String, avatar: Option<Avatar>) -> Self {
        Self {
            id: Uuid::new_v4(),
            speaker,
            text,
            at: Utc::now(),
            avatar,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text.into(), None)
    }

    pub fn ai(text: impl Into<String>, avatar: &Avatar) -> Self {
        Self::new(Speaker::Ai, text.into(), Some(avatar.clone()))
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Speaker::System, text.into(), None)
    }

    /// Entry shown for a settled exchange.
    pub fn from_outcome(outcome: &ExchangeOutcome, avatar: &Avatar) -> Self {
        match outcome {
            ExchangeOutcome::Response(text) => Self::ai(text.clone(), avatar),
            ExchangeOutcome::ApplicationError(error) => {
                Self::system(messages::application_error(error))
            }
            ExchangeOutcome::TransportError(error) => {
                Self::system(messages::transport_error(error))
            }
        }
    }
}
