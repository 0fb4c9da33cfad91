//! Error types for the medical-report RAG system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG system errors
#[derive(Debug, Error)]
pub enum Error {
    /// Required collaborator credential or setting is absent
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// OCR/text-extraction collaborator failed
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    /// Embedding generation failed
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Storage I/O error on the vector index
    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// Operation targets a user or report with no existing collection
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generative model call failed or timed out
    #[error("Answer generation failed: {0}")]
    GenerationFailed(String),

    /// Malformed client request (missing multipart field, bad payload)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration-missing error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationMissing(message.into())
    }

    /// Create an extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::ExtractionFailed(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an index error
    pub fn index(message: impl Into<String>) -> Self {
        Self::IndexUnavailable(message.into())
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailed(message.into())
    }

    /// Create an invalid-request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::ConfigurationMissing(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "configuration_missing", msg.clone())
            }
            Error::ExtractionFailed(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "extraction_failed", msg.clone())
            }
            Error::Embedding(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error", msg.clone())
            }
            Error::IndexUnavailable(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "index_unavailable", msg.clone())
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            Error::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg.clone()),
            Error::GenerationFailed(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_failed", msg.clone())
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
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
