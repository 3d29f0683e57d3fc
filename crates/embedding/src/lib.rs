//! Text embedding for filtersense.
//!
//! Everything in the extraction engine reduces to two primitives: turn a
//! piece of text into a dense vector, and compare two vectors by cosine
//! similarity. This crate owns both.
//!
//! Two provider modes are supported:
//!
//! - **API mode** - Call out to a hosted feature-extraction endpoint
//!   (Hugging Face router endpoints work out of the box).
//! - **Stub mode** - Deterministic hash-derived vectors. No network, no
//!   model files. Identical text always produces the identical vector, and
//!   unrelated texts land near-orthogonal, which is exactly what tests
//!   need.
//!
//! Providers are exposed behind the [`TextEmbedder`] trait so the engine
//! never knows which one it is talking to. [`CachingEmbedder`] wraps any
//! provider with an LRU so a schema's option descriptions are embedded once,
//! not once per query.
//!
//! ## Quick example
//!
//! ```
//! use embedding::{EmbeddingConfig, StubEmbedder, TextEmbedder, cosine_similarity};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let embedder = StubEmbedder::new(&EmbeddingConfig::default());
//! let a = embedder.embed("vegan food").await?;
//! let b = embedder.embed("vegan food").await?;
//! assert!(cosine_similarity(&a, &b) > 0.999);
//! # Ok(())
//! # }
//! ```
//!
//! ## Env vars to know
//!
//! - `FILTERSENSE_EMBEDDING_API_URL` - Override the API endpoint
//! - `FILTERSENSE_EMBEDDING_API_TOKEN` - Bearer token for the endpoint

pub mod config;
pub mod error;

mod api;
mod cache;
mod normalize;
mod stub;

pub use crate::api::ApiEmbedder;
pub use crate::cache::CachingEmbedder;
pub use crate::config::EmbeddingConfig;
pub use crate::error::EmbeddingError;
pub use crate::normalize::{cosine_similarity, l2_normalize_in_place};
pub use crate::stub::StubEmbedder;

use std::sync::Arc;

use async_trait::async_trait;

/// Provider-agnostic embedding interface.
///
/// Implementations must be deterministic for a fixed provider: the same
/// text embeds to the same vector for the lifetime of the process.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Label of the underlying model, surfaced in logs and cache keys.
    fn model_name(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch of texts, preserving input order.
    ///
    /// The default implementation loops over [`embed`](Self::embed);
    /// providers with a native batch endpoint should override it.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for dyn TextEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEmbedder")
            .field("model", &self.model_name())
            .finish_non_exhaustive()
    }
}

/// Build the provider described by `cfg`.
///
/// `"stub"` constructs immediately; `"api"` validates the endpoint
/// configuration up front so a misconfigured deployment fails at warm-up
/// rather than on the first query.
pub fn build_embedder(cfg: &EmbeddingConfig) -> Result<Arc<dyn TextEmbedder>, EmbeddingError> {
    match cfg.mode.as_str() {
        "stub" => Ok(Arc::new(StubEmbedder::new(cfg))),
        "api" => Ok(Arc::new(ApiEmbedder::new(cfg)?)),
        other => Err(EmbeddingError::InvalidConfig(format!(
            "unknown embedding mode '{other}' (expected 'stub' or 'api')"
        ))),
    }
}
