use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::DomainError;

/// Maps domain errors onto the shared `{success, error, code}` envelope.
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::FileValidation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::DocumentProcessing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::Embedding(_) | DomainError::Generation(_) => StatusCode::BAD_GATEWAY,
            DomainError::Search(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = json!({
            "success": false,
            "error": self.0.to_string(),
            "code": self.0.code(),
        });

        (status, Json(body)).into_response()
    }
}
