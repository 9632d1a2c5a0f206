use async_trait::async_trait;

use crate::outcome::ExchangeOutcome;

/// Backend gateway answering the two chat exchanges.
#[async_trait]
pub trait ExchangeRelay: Send + Sync {
    /// Send the user's message and wait for the tutor's reply.
    async fn send_user_message(&self, text: &str) -> ExchangeOutcome;

    /// Ask the tutor to re-engage an idle user. Carries no payload.
    async fn send_inactivity_nudge(&self) -> ExchangeOutcome;
}
