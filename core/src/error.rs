//! Error types for the todo API client.
//!
//! # Design
//! Failures where no response arrived (`Transport`) are kept apart from
//! failures where the server answered outside 2xx (`Status`). Every non-2xx
//! status lands in `Status` with the code, reason phrase, and raw body.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by `TodoClient` and `ApiClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned a status outside [200, 300).
    #[error("HTTP error {status}: {status_text}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    /// The HTTP status code, if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
