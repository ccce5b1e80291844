//! Error codes and the JSON error body returned by the HTTP API.
//!
//! DESIGN
//! ======
//! Each service owns a `thiserror` enum and implements [`ErrorCode`]. Route
//! handlers choose the HTTP status per variant and wrap the error in
//! [`ApiError`], which renders as `{ "code": ..., "message": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use widgets::WidgetError;

/// Machine-readable code carried by every service error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

impl ErrorCode for WidgetError {
    fn error_code(&self) -> &'static str {
        WidgetError::error_code(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, err: &(impl ErrorCode + ?Sized)) -> Self {
        if status.is_server_error() {
            tracing::error!(code = err.error_code(), retryable = err.retryable(), error = %err, "request failed");
        }
        Self { status, body: ErrorBody { code: err.error_code(), message: err.to_string() } }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, body: ErrorBody { code, message: message.into() } }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
