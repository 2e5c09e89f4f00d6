//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use wallgauge::{ErrorKind, MeasureError};

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("front image is required")]
    MissingFront,

    #[error("File too large: maximum request size is {max_mb} MB")]
    FileTooLarge { max_mb: usize },

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("{0}")]
    Measure(#[from] MeasureError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        ApiError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Report a multipart body that hit the upload limit as `FileTooLarge`.
    pub fn with_upload_limit(self, max_mb: usize) -> Self {
        match self {
            ApiError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                ApiError::FileTooLarge { max_mb }
            }
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Measure(e) if e.kind() == ErrorKind::ImageDecode => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::MissingFront
            | ApiError::InvalidField { .. }
            | ApiError::Measure(_)
            | ApiError::Multipart(_) => StatusCode::BAD_REQUEST,
            ApiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingFront => "MISSING_FRONT",
            ApiError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ApiError::InvalidField { .. } => "INVALID_FIELD",
            ApiError::Measure(e) => e.kind().as_str(),
            ApiError::Multipart(_) => "MULTIPART_ERROR",
            ApiError::Join(_) => "TASK_ERROR",
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}
