use serde::{Deserialize, Serialize};

/// Which backend exchange produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeKind {
    UserMessage,
    InactivityNudge,
}

impl ExchangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserMessage => "user_message",
            Self::InactivityNudge => "inactivity_nudge",
        }
    }
}

/// Settled result of a backend exchange.
///
/// Exchanges never fail past the call site; every failure is one of these
/// variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum ExchangeOutcome {
    /// `{"response": ...}` from a successful exchange.
    Response(String),
    /// `{"error": ...}` inside a successful exchange.
    ApplicationError(String),
    /// Connection failure, non-success status or undecodable body.
    TransportError(String),
}

impl ExchangeOutcome {
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }
}
