//! Error handling for the bookshelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::response::Envelope;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation { message: String, code: String },

    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    /// Server-side failure whose message is meant for the client
    #[error("{message}")]
    Server { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: "validation_error".to_string(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    /// Create a server error carrying a client-facing message
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
            code: "internal_error".to_string(),
        }
    }

    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Server { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    /// Render the error; with `mask_causes` wrapped `anyhow` causes are not
    /// sent to the client.
    fn render(self, mask_causes: bool) -> Response {
        let error_id = Uuid::now_v7();
        let status = self.status();
        let masked = mask_causes && matches!(self, AppError::Internal(_));

        let (error_code, message) = match self {
            AppError::Validation { message, code }
            | AppError::NotFound { message, code }
            | AppError::BadRequest { message, code }
            | AppError::Server { message, code } => (code, message),
            AppError::Internal(e) => ("internal_error".to_string(), e.to_string()),
        };

        tracing::error!(
            error_id = %error_id,
            error_code = %error_code,
            status_code = %status.as_u16(),
            detail = %message,
            "Request error"
        );

        let message = if masked {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        let body = if status.is_server_error() {
            Envelope::error(message)
        } else {
            Envelope::fail(message)
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal causes stay in the log for release builds
        self.render(cfg!(not(debug_assertions)))
    }
}

/// Result type alias for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;
