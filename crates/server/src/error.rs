use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use filtersense::ExtractError;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    #[error("embedding provider is warming up")]
    ProviderUnavailable,

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("internal server error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ServerError::BadRequest(_) | ServerError::InvalidSchema(_) => StatusCode::BAD_REQUEST,
            ServerError::SchemaNotFound(_) | ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Extraction(_)
            | ServerError::Internal(_)
            | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::Authentication(_) => "AUTH_FAILED",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::InvalidSchema(_) => "INVALID_SCHEMA",
            ServerError::SchemaNotFound(_) => "SCHEMA_NOT_FOUND",
            ServerError::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            ServerError::Extraction(_) => "EXTRACTION_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<ExtractError> for ServerError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::SchemaNotFound(id) => ServerError::SchemaNotFound(id),
            ExtractError::InvalidSchema(msg) => ServerError::InvalidSchema(msg),
            ExtractError::ProviderUnavailable => ServerError::ProviderUnavailable,
            ExtractError::Embedding(inner) => ServerError::Extraction(inner.to_string()),
        }
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::BadRequest(format!("JSON parse error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
