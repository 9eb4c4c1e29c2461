//! Classified result of one relay invocation and its HTTP rendering.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::submission::ValidationFailure;

/// What happened to one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    ValidationFailed(ValidationFailure),
    ConfigurationMissing,
    /// Connection verification failed; nothing was sent.
    ServiceUnavailable,
    AuthenticationFailed,
    ConnectionFailed,
    UnknownFailure,
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Sent => StatusCode::OK,
            Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing text. Generic for operator-side failures.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Sent => "Email sent successfully",
            Self::ValidationFailed(ValidationFailure::MissingFields) => "Missing required fields",
            Self::ValidationFailed(ValidationFailure::InvalidEmail) => "Invalid email address",
            Self::ConfigurationMissing => "Server configuration error",
            Self::ServiceUnavailable => "Email service unavailable",
            Self::AuthenticationFailed => "Email authentication failed. Please check credentials.",
            Self::ConnectionFailed => "Could not connect to email service.",
            Self::UnknownFailure => "Failed to send email",
        }
    }

    pub fn to_response(&self) -> ContactResponse {
        ContactResponse::new(self.status(), self.message())
    }
}

/// JSON body returned to the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactResponse {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
}

impl ContactResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ContactResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
