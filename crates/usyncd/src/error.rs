//! HTTP error mapping for the daemon

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum AppError {
    #[error("remote source unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl From<usync_core::Error> for AppError {
    fn from(err: usync_core::Error) -> Self {
        match err {
            usync_core::Error::RemoteSource(msg) => Self::RemoteUnavailable(msg),
            usync_core::Error::Store(msg) => Self::Store(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::RemoteUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
