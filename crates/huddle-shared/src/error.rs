use thiserror::Error;

/// Failures of a single call to the remote messaging API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
