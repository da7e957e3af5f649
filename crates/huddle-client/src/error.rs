use thiserror::Error;

use huddle_shared::ApiError;

/// Failure of a synchronization operation, scoped to one resource.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The request was rejected or never completed.
    #[error("Network failure: {0}")]
    Network(#[from] ApiError),

    /// The request succeeded but carried nothing usable.
    #[error("Empty result: {0}")]
    EmptyResult(&'static str),

    /// The response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
