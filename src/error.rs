//! Error types for the harbour cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache, its backing stores and the HTTP layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not present (absent, expired or unreadable)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backing store refused or failed an operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem failure in a durable store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored or submitted text is not valid JSON for the expected type
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Upstream rows did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            CacheError::Storage(_) | CacheError::Io(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Serialization(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the harbour cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

        let test_cases = vec![
            (CacheError::NotFound("key".to_string()), StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (CacheError::MalformedResponse("row 0".to_string()), StatusCode::BAD_GATEWAY),
            (CacheError::Storage("full".to_string()), StatusCode::SERVICE_UNAVAILABLE),
            (CacheError::Io(io), StatusCode::SERVICE_UNAVAILABLE),
            (CacheError::Serialization(bad_json), StatusCode::INTERNAL_SERVER_ERROR),
            (CacheError::Internal("error".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.into_response().status(), expected_status);
        }
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }
}
