//! The `{status, message, data}` envelope every endpoint answers with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Outcome class reported in the envelope's `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The request was served (2xx).
    Success,
    /// The client sent something unusable (4xx).
    Fail,
    /// The server could not complete the request (5xx).
    Error,
}

/// Response wrapper; `message` and `data` are omitted when empty.
#[derive(Debug, Serialize)]
pub struct Envelope<T = ()> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Successful response carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope {
    /// Successful response with a message and no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// An envelope paired with its HTTP status code.
#[derive(Debug)]
pub struct Reply<T = ()> {
    pub code: StatusCode,
    pub envelope: Envelope<T>,
}

impl<T: Serialize> Reply<T> {
    pub fn ok(envelope: Envelope<T>) -> Self {
        Self {
            code: StatusCode::OK,
            envelope,
        }
    }

    pub fn created(envelope: Envelope<T>) -> Self {
        Self {
            code: StatusCode::CREATED,
            envelope,
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self.envelope)).into_response()
    }
}
