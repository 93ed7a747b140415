use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::ApiResponse;
use models::errors::ModelError;
use service::{MarketError, ServiceError};
use thiserror::Error;
use tracing::error;

/// Handler failure, always rendered as a `{ data, success, message }` envelope.
///
/// Expected outcomes keep HTTP 200 so clients branch on `success`; malformed
/// input is a 400 and store faults a 500 with a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Market(#[from] MarketError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("upload storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self {
        ApiError::BadRequest(rej.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rej: QueryRejection) -> Self {
        ApiError::BadRequest(rej.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        ApiError::Service(ServiceError::Model(e))
    }
}

fn envelope(status: StatusCode, message: String) -> Response {
    (status, ApiResponse::<()>::fail(message)).into_response()
}

fn fault(e: &ServiceError) -> Response {
    error!(error = %e, "request failed");
    envelope(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => envelope(StatusCode::BAD_REQUEST, msg),
            ApiError::Market(MarketError::Store(e)) => ApiError::Service(e).into_response(),
            ApiError::Market(e) => envelope(StatusCode::OK, e.to_string()),
            ApiError::Service(ServiceError::Validation(msg))
            | ApiError::Service(ServiceError::Model(ModelError::Validation(msg))) => {
                envelope(StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Service(e) => fault(&e),
            ApiError::Storage(e) => {
                error!(error = %e, "upload write failed");
                envelope(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn expected_outcome_is_ok_status_with_failure_envelope() {
        let (status, body) = render(MarketError::ServiceNotFound.into()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"data": null, "success": false, "message": "Service not found"}));
    }

    #[tokio::test]
    async fn store_fault_hides_details() {
        let (status, body) = render(MarketError::Store(ServiceError::db("connection reset")).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn validation_is_bad_request() {
        let (status, body) = render(ModelError::Validation("name required".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name required");
    }
}
