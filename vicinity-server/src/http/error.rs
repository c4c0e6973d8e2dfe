//! HTTP error handling and response types

use axum::{
    BoxError, Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Stable code for programmatic handling
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Timeout(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Timeout(msg) => (StatusCode::REQUEST_TIMEOUT, ApiError::new("TIMEOUT", msg)),
            AppError::Internal(msg) => {
                tracing::error!("Request failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", msg),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<vicinity_core::Error> for AppError {
    fn from(err: vicinity_core::Error) -> Self {
        use vicinity_core::Error;

        match err {
            Error::InvalidParameters(_) | Error::InvalidData(_) => {
                AppError::BadRequest(err.to_string())
            }
            Error::NoNodes | Error::UnknownNode(_) | Error::DisconnectedOrigin(_) => {
                AppError::NotFound(err.to_string())
            }
            Error::Cancelled => AppError::Timeout("Analysis exceeded the request timeout".into()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Analysis task failed: {err}"))
    }
}

/// Maps failures of the tower middleware stack to JSON errors
pub async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::Timeout("Request timed out".to_string())
    } else {
        AppError::Internal(format!("Unhandled middleware error: {err}"))
    }
}
