//! exchange_relay - the backend side of a tutoring session
//!
//! Two JSON exchanges (user message, inactivity nudge) with a tagged
//! outcome, and the navigator that opens the submission resource once the
//! session budget is used up.

pub mod error;
pub mod http;
pub mod navigator;
pub mod outcome;
pub mod relay;

pub use error::{RelayError, Result};
pub use http::HttpExchangeRelay;
pub use navigator::{BrowserNavigator, Navigator};
pub use outcome::{ExchangeKind, ExchangeOutcome};
pub use relay::ExchangeRelay;
