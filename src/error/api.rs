//! # HTTP API Errors
//!
//! [`ApiError`] is the single error type returned by handlers. It renders
//! the JSON envelope
//!
//! ```text
//! {"status":"error","code":"EMAIL_TAKEN","message":"email is already in use"}
//! ```
//!
//! Status classes: `400` invalid input, `401` unauthorized, `403` not the
//! owner, `404` not found, `409` conflict, `500` internal, `503` not ready.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::account::service::AccountError;
use crate::post::service::PostError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: &'static str,
    code: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    pub fn forbidden(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code, message)
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, message)
    }

    /// A `500` whose message never carries internal details.
    pub fn internal(code: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, "internal server error")
    }

    pub fn service_unavailable(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, code, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let message = err.to_string();
        match err {
            AccountError::InvalidEmail => Self::bad_request("INVALID_EMAIL", message),
            AccountError::InvalidPassword => Self::bad_request("INVALID_PASSWORD", message),
            AccountError::InvalidUsername => Self::bad_request("INVALID_USERNAME", message),
            AccountError::EmailTaken => Self::conflict("EMAIL_TAKEN", message),
            AccountError::UsernameTaken => Self::conflict("USERNAME_TAKEN", message),
            AccountError::BadCredentials => Self::unauthorized("INVALID_CREDENTIALS", message),
            AccountError::NotFound => Self::not_found("NOT_FOUND", message),
            AccountError::Internal(e) => {
                error!(error = ?e, "account operation failed");
                Self::internal("INTERNAL")
            }
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        let message = err.to_string();
        match err {
            PostError::MissingTitle => Self::bad_request("MISSING_FIELDS", message),
            PostError::TitleEmpty => Self::bad_request("TITLE_EMPTY", message),
            PostError::EmptyPatch => Self::bad_request("EMPTY_PATCH", message),
            PostError::NotFound => Self::not_found("POST_NOT_FOUND", message),
            PostError::Forbidden => Self::forbidden("FORBIDDEN", message),
            PostError::Internal(e) => {
                error!(error = ?e, "post operation failed");
                Self::internal("INTERNAL")
            }
        }
    }
}
