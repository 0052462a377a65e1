//! Error types for the product service.

use thiserror::Error;

/// Errors that can occur while talking to the product backend.
///
/// Every variant means "the request failed"; callers that only care about that
/// can treat the enum as opaque. [`ServiceError::is_not_found`] singles out the one
/// case a lookup by id may want to handle differently.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Request to {path} failed with status {status}")]
    Status { status: u16, path: String },

    /// The requested product does not exist.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The response body could not be decoded into the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The request could not be built (e.g. a bad MIME type on an upload).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::Decode(e.to_string())
        } else if e.is_builder() {
            ServiceError::InvalidRequest(e.to_string())
        } else {
            ServiceError::Transport(e.to_string())
        }
    }
}
