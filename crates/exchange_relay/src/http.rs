//! HTTP implementation of the exchange relay

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use session_core::messages::DEFAULT_TRANSPORT_ERROR;

use crate::error::{RelayError, Result};
use crate::outcome::{ExchangeKind, ExchangeOutcome};
use crate::relay::ExchangeRelay;

pub const USER_MESSAGE_PATH: &str = "/get_response";
pub const INACTIVITY_NUDGE_PATH: &str = "/get_prompt_response";

#[derive(Serialize)]
struct UserMessageRequest<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct EmptyRequest {}

#[derive(Deserialize, Debug, Default)]
struct ReplyBody {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ReplyBody {
    // An empty `error` field carries no error.
    fn normalized(mut self) -> Self {
        self.error = self.error.filter(|error| !error.is_empty());
        self
    }
}

/// Relay talking JSON over HTTP to the tutoring backend
#[derive(Clone, Debug)]
pub struct HttpExchangeRelay {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExchangeRelay {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::builder().build()?, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self> {
        url::Url::parse(base_url).map_err(|e| RelayError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn exchange<B: Serialize + ?Sized>(
        &self,
        kind: ExchangeKind,
        path: &str,
        body: &B,
    ) -> ExchangeOutcome {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} ({})", url, kind.as_str());

        let response = match self.client.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} exchange failed to send: {}", kind.as_str(), e);
                return ExchangeOutcome::TransportError(e.to_string());
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{} exchange body read failed: {}", kind.as_str(), e);
                return ExchangeOutcome::TransportError(e.to_string());
            }
        };
        let reply = serde_json::from_slice::<ReplyBody>(&bytes).map(ReplyBody::normalized);

        if !status.is_success() {
            let message = reply
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| DEFAULT_TRANSPORT_ERROR.to_string());
            warn!("{} exchange returned {}: {}", kind.as_str(), status, message);
            return ExchangeOutcome::TransportError(message);
        }

        match reply {
            Ok(ReplyBody {
                error: Some(error), ..
            }) => {
                warn!("{} exchange reported error: {}", kind.as_str(), error);
                ExchangeOutcome::ApplicationError(error)
            }
            Ok(ReplyBody {
                response: Some(text),
                ..
            }) => {
                info!("{} exchange answered ({} chars)", kind.as_str(), text.chars().count());
                ExchangeOutcome::Response(text)
            }
            Ok(_) => {
                warn!("{} exchange reply had neither response nor error", kind.as_str());
                ExchangeOutcome::TransportError(DEFAULT_TRANSPORT_ERROR.to_string())
            }
            Err(e) => {
                warn!("{} exchange reply is not valid JSON: {}", kind.as_str(), e);
                ExchangeOutcome::TransportError(e.to_string())
            }
        }
    }
}

#[async_trait]
impl ExchangeRelay for HttpExchangeRelay {
    async fn send_user_message(&self, text: &str) -> ExchangeOutcome {
        self.exchange(
            ExchangeKind::UserMessage,
            USER_MESSAGE_PATH,
            &UserMessageRequest { message: text },
        )
        .await
    }

    async fn send_inactivity_nudge(&self) -> ExchangeOutcome {
        self.exchange(
            ExchangeKind::InactivityNudge,
            INACTIVITY_NUDGE_PATH,
            &EmptyRequest {},
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            HttpExchangeRelay::new("not a url"),
            Err(RelayError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn trims_trailing_slash() {
        let relay = HttpExchangeRelay::new("http://localhost:5000/").unwrap();
        assert_eq!(relay.base_url(), "http://localhost:5000");
    }

    #[test]
    fn request_bodies_match_backend_contract() {
        let user = serde_json::to_value(UserMessageRequest { message: "hi" }).unwrap();
        assert_eq!(user, serde_json::json!({ "message": "hi" }));
        assert_eq!(serde_json::to_value(EmptyRequest {}).unwrap(), serde_json::json!({}));
    }
}
