//! Error types.
//!
//! `Error` covers process-level failures (startup, binding) and is what
//! `main` returns. `ApiError` is confined to a single request: it always
//! becomes an HTTP status plus an `ErrorResponse` body, so nothing crosses
//! the HTTP boundary unformatted.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to connect to document store: {0}")]
    Connection(#[from] StoreError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid listen address `{0}`")]
    InvalidAddress(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed client input.
    #[error("{0}")]
    Validation(String),

    #[error("todo not found")]
    NotFound,

    /// A store call failed; `message` is what the client sees.
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn store(message: &'static str, source: StoreError) -> Self {
        ApiError::Store { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(reason) => ErrorResponse {
                message: "Invalid request".to_string(),
                error: reason,
            },
            ApiError::NotFound => ErrorResponse {
                message: "Todo not found".to_string(),
                error: ApiError::NotFound.to_string(),
            },
            ApiError::Store { message, source } => {
                error!(error = %source, "{message}");
                ErrorResponse {
                    message: message.to_string(),
                    error: source.to_string(),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
