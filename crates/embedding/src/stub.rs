use async_trait::async_trait;
use fxhash::hash64;

use crate::normalize::l2_normalize_in_place;
use crate::{EmbeddingConfig, EmbeddingError, TextEmbedder};

/// Deterministic offline provider.
///
/// Vectors are drawn from an xorshift stream seeded with a hash of the
/// input text: identical text always embeds identically (self-similarity
/// is exactly 1.0), while distinct texts land near-orthogonal at the
/// default dimension. Useful for tests and for running the full service
/// without network access or model files.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    model_name: String,
    dimension: usize,
    normalize: bool,
}

impl StubEmbedder {
    pub fn new(cfg: &EmbeddingConfig) -> Self {
        Self {
            model_name: cfg.model_name.clone(),
            dimension: cfg.dimension,
            normalize: cfg.normalize,
        }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        // Seed must never be zero or xorshift degenerates to all zeros.
        let mut state = hash64(text.as_bytes()) | 1;
        let mut v = vec![0f32; self.dimension];
        for value in v.iter_mut() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            // Map the top bits onto [-1, 1).
            *value = ((state >> 40) as f32 / 8_388_608.0) - 1.0;
        }
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

#[async_trait]
impl TextEmbedder for StubEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}
