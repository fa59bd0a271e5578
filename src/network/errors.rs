use thiserror::Error;

// * Unified error type for the network layer.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0} fetching page")]
    Status(u16),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
