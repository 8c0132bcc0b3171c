use thiserror::Error;

use crate::session::SessionError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The page refused to proceed; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The proxy answered with its error envelope.
    #[error("{error} (status {status})")]
    Api {
        status: u16,
        error: String,
        details: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Resume error: {0}")]
    Resume(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Status of a proxy-side failure, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
