//! Error types for the HTTP layer.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::{DatabaseError, ValidationError};
use thiserror::Error;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field.
    #[error("{0}")]
    BadRequest(String),

    /// Rejected by input validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// A JSON request body whose rejection is answered as [`ApiError::BadRequest`].
pub type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(DatabaseError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Database(DatabaseError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Database(DatabaseError::AlreadyExists { .. }) => StatusCode::CONFLICT,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Database(DatabaseError::Validation(err)) => err.to_string(),
            ApiError::Database(err) => {
                if status.is_server_error() {
                    tracing::error!("Database error: {}", err);
                }
                err.to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::bad_request("ID is required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation(ValidationError::InvalidEmail("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Database(DatabaseError::NotFound {
                entity: "Order",
                id: "1".into()
            })
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Database(DatabaseError::Validation(ValidationError::Empty(
                "page_id".into()
            )))
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Database(DatabaseError::AlreadyExists {
                entity: "BotConfig",
                id: "PAGE_1".into()
            })
            .status(),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = ApiError::Database(DatabaseError::NotFound {
            entity: "Order",
            id: "42".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Order not found: 42");
    }
}
