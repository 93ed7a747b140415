use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform response envelope: `{ data, success, message }`.
///
/// Failures carry `success = false` and usually `data = null`; callers must
/// check `success` rather than the HTTP status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub success: bool,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self { data: Some(data), success: true, message: message.into() }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { data: None, success: false, message: message.into() }
    }

    /// Failure that still carries a placeholder payload.
    pub fn fail_with(data: T, message: impl Into<String>) -> Self {
        Self { data: Some(data), success: false, message: message.into() }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
