use embedding::EmbeddingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors surfaced by the extraction engine.
///
/// Every variant is terminal for the request that raised it; nothing is
/// retried internally and no failure leaves the registry partially
/// mutated. A filter type falling below its schema threshold is not an
/// error — it is a valid "no match" outcome.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Query resolution referenced a schema id the registry has never
    /// issued.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    /// Schema construction rejected its input: empty filter-type set,
    /// empty option set, duplicate option keys, or a non-finite
    /// threshold.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// The shared embedding provider has not finished initializing.
    #[error("embedding provider not ready")]
    ProviderUnavailable,

    /// The embedding provider failed while computing vectors.
    #[error("embedding failure: {0}")]
    Embedding(#[from] EmbeddingError),
}
