//! Mapping engine errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use mailveil_core::Error;

/// Handler error: status from the error kind, body `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::MappingNotFound(_) => StatusCode::NOT_FOUND,
            Error::MissingMapping | Error::InvalidDocumentId(_) => StatusCode::BAD_REQUEST,
            Error::PlaceholderCollision(_) | Error::DuplicatePlaceholder(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::RecognizerFailure(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self(Error::Internal(format!("worker task failed: {}", e)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
