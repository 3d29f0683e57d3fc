use thiserror::Error;

/// Errors surfaced by embedding providers.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Configuration is inconsistent (e.g., api mode without an endpoint).
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),

    /// The remote endpoint could not be reached or timed out.
    #[error("embedding request failed: {0}")]
    Request(String),

    /// The remote endpoint answered with a non-success status.
    #[error("embedding endpoint returned {status}: {body}")]
    Endpoint { status: u16, body: String },

    /// The endpoint response did not contain vectors in a shape we
    /// understand.
    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        EmbeddingError::Request(err.to_string())
    }
}
