//! Errors surfaced by `TodoClient`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 404: no todo with the requested id.
    #[error("resource not found")]
    NotFound,

    /// Any other unexpected status, with the raw body for debugging.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
