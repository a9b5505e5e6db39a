//! Request error type shared by all hub endpoints.
//!
//! Two kinds only: a validation failure (missing/empty field, HTTP 400,
//! message returned to the caller) and an internal failure (HTTP 500,
//! detail logged but never returned).

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Internal(String),
}

impl HubError {
    /// Validation error for a required request field that was missing or
    /// empty.
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("{} is required", field))
    }
}

impl From<serde_json::Error> for HubError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("serialization failed: {}", err))
    }
}

impl ResponseError for HubError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Validation(message) => message.clone(),
            Self::Internal(detail) => {
                log::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(json!({
            "ok": false,
            "error": message,
        }))
    }
}

/// Convenience alias for the hub request handlers.
pub type HubResult<T> = Result<T, HubError>;
