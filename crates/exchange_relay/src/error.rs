use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid backend url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RelayError>;
