//! Error types for document chat

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::DocumentFormat;

/// Result type alias for document chat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when the answering service rate-limits us
pub const QUOTA_EXCEEDED_MESSAGE: &str = "API quota exceeded. Please try again later.";

/// Document chat errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Uploaded payload could not be turned into text
    #[error("Failed to extract {format} document: {message}")]
    Extraction {
        format: DocumentFormat,
        message: String,
    },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Answering service refused or failed the request
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Malformed request (missing upload field, unreadable multipart body)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Session does not exist
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Export artifact could not be generated
    #[error("Export failed: {0}")]
    Export(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(format: DocumentFormat, message: impl Into<String>) -> Self {
        Self::Extraction {
            format,
            message: message.into(),
        }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the query failure, if this error is one
    pub fn as_query(&self) -> Option<&QueryError> {
        match self {
            Error::Query(err) => Some(err),
            _ => None,
        }
    }
}

/// Kind of answering-service failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// HTTP 429 from the service. Not retried automatically.
    QuotaExceeded,
    /// Any other non-success response
    ServiceError,
}

/// Failure reported by the answering service
#[derive(Debug, Clone, Error)]
#[error("{detail}")]
pub struct QueryError {
    pub kind: QueryErrorKind,
    /// User-facing message for quota errors, raw response body otherwise
    pub detail: String,
}

impl QueryError {
    pub fn quota_exceeded() -> Self {
        Self {
            kind: QueryErrorKind::QuotaExceeded,
            detail: QUOTA_EXCEEDED_MESSAGE.to_string(),
        }
    }

    pub fn service(detail: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::ServiceError,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::Extraction { .. } => (StatusCode::BAD_REQUEST, "extraction_error", self.to_string()),
            Error::UnsupportedFileType(ext) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                format!("Unsupported file type: {}", ext),
            ),
            Error::Query(err) => match err.kind {
                QueryErrorKind::QuotaExceeded => {
                    (StatusCode::TOO_MANY_REQUESTS, "quota_exceeded", err.detail.clone())
                }
                QueryErrorKind::ServiceError => {
                    (StatusCode::BAD_GATEWAY, "service_error", err.detail.clone())
                }
            },
            Error::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg.clone()),
            Error::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Session not found: {}", id),
            ),
            Error::Export(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "export_error", msg.clone()),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error", err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_carries_static_message() {
        let err = QueryError::quota_exceeded();
        assert_eq!(err.kind, QueryErrorKind::QuotaExceeded);
        assert_eq!(err.to_string(), QUOTA_EXCEEDED_MESSAGE);
    }

    #[test]
    fn test_status_codes() {
        let quota: Error = QueryError::quota_exceeded().into();
        assert_eq!(quota.into_response().status(), StatusCode::TOO_MANY_REQUESTS);

        let service: Error = QueryError::service("boom").into();
        assert_eq!(service.into_response().status(), StatusCode::BAD_GATEWAY);

        let parse = Error::extraction(DocumentFormat::Csv, "bad row");
        assert_eq!(parse.into_response().status(), StatusCode::BAD_REQUEST);

        let missing = Error::SessionNotFound("nope".to_string());
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }
}
