//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Store layer error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// Status, machine-readable code and whether the message is safe to return
    fn classify(&self) -> (StatusCode, &'static str, bool) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", true),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", true),
            ApiError::Store(e) => match e {
                StoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", true),
                StoreError::DuplicateSlug(_) => (StatusCode::BAD_REQUEST, "DUPLICATE_SLUG", true),
                StoreError::Archive(_) => (StatusCode::BAD_REQUEST, "INVALID_ARCHIVE", true),
                StoreError::DashboardNotFound(_) => {
                    (StatusCode::NOT_FOUND, "DASHBOARD_NOT_FOUND", true)
                }
                StoreError::LinkNotFound(_) => (StatusCode::NOT_FOUND, "LINK_NOT_FOUND", true),
                StoreError::Io(_) | StoreError::Serialization(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", false)
                }
            },
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", false),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR", false),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, public) = self.classify();

        let request_id = uuid::Uuid::new_v4().to_string();

        // Log the error
        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let message = if public {
            self.to_string()
        } else {
            "Internal server error".to_string()
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let cases = [
            (StoreError::DuplicateSlug("a".into()), StatusCode::BAD_REQUEST),
            (StoreError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (StoreError::DashboardNotFound("a".into()), StatusCode::NOT_FOUND),
            (StoreError::LinkNotFound("b".into()), StatusCode::NOT_FOUND),
            (StoreError::Serialization("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let (_, code, public) =
            ApiError::Store(StoreError::Serialization("secret path".into())).classify();
        assert_eq!(code, "STORAGE_ERROR");
        assert!(!public);
    }
}
