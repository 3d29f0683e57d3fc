use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lru::LruCache;

use crate::{EmbeddingError, TextEmbedder};

/// LRU-caching wrapper around any [`TextEmbedder`].
///
/// A schema's option descriptions are stable for its lifetime, so after
/// the first resolution against a schema only the query itself is embedded.
/// Batch calls embed only the cache misses, in one provider round-trip,
/// and preserve input order.
pub struct CachingEmbedder {
    inner: Arc<dyn TextEmbedder>,
    cache: Mutex<LruCache<String, Arc<Vec<f32>>>>,
}

impl CachingEmbedder {
    pub fn new(inner: Arc<dyn TextEmbedder>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity clamped to >= 1");
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn cached(&self, text: &str) -> Option<Arc<Vec<f32>>> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(text).cloned()
    }

    fn store(&self, text: &str, vector: Vec<f32>) -> Arc<Vec<f32>> {
        let vector = Arc::new(vector);
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.put(text.to_string(), vector.clone());
        vector
    }
}

#[async_trait]
impl TextEmbedder for CachingEmbedder {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if let Some(hit) = self.cached(text) {
            return Ok(hit.as_ref().clone());
        }
        let vector = self.inner.embed(text).await?;
        Ok(self.store(text, vector).as_ref().clone())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut resolved: Vec<Option<Arc<Vec<f32>>>> = texts.iter().map(|t| self.cached(t)).collect();

        let misses: Vec<usize> = resolved
            .iter()
            .enumerate()
            .filter_map(|(idx, v)| v.is_none().then_some(idx))
            .collect();

        if !misses.is_empty() {
            let miss_texts: Vec<String> = misses.iter().map(|&i| texts[i].clone()).collect();
            let vectors = self.inner.embed_batch(&miss_texts).await?;
            if vectors.len() != miss_texts.len() {
                return Err(EmbeddingError::MalformedResponse(format!(
                    "provider returned {} embeddings for {} inputs",
                    vectors.len(),
                    miss_texts.len()
                )));
            }
            for (&idx, vector) in misses.iter().zip(vectors) {
                resolved[idx] = Some(self.store(&texts[idx], vector));
            }
        }

        Ok(resolved
            .into_iter()
            .map(|v| v.expect("all cache slots filled").as_ref().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EmbeddingConfig, StubEmbedder};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts provider calls so tests can assert on cache behavior.
    struct CountingEmbedder {
        inner: StubEmbedder,
        calls: AtomicUsize,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self {
                inner: StubEmbedder::new(&EmbeddingConfig::default()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextEmbedder for CountingEmbedder {
        fn model_name(&self) -> &str {
            self.inner.model_name()
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed(text).await
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(texts.len(), Ordering::SeqCst);
            self.inner.embed_batch(texts).await
        }
    }

    #[tokio::test]
    async fn repeated_embed_hits_cache() {
        let counting = Arc::new(CountingEmbedder::new());
        let cached = CachingEmbedder::new(counting.clone(), 16);

        let a = cached.embed("hello").await.unwrap();
        let b = cached.embed("hello").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn batch_embeds_only_misses() {
        let counting = Arc::new(CountingEmbedder::new());
        let cached = CachingEmbedder::new(counting.clone(), 16);

        cached.embed("warm").await.unwrap();
        let texts = vec!["warm".to_string(), "cold".to_string()];
        let batch = cached.embed_batch(&texts).await.unwrap();

        assert_eq!(batch.len(), 2);
        // One call for "warm", one for "cold"; "warm" not re-embedded.
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
        assert_eq!(batch[0], cached.embed("warm").await.unwrap());
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let cached = CachingEmbedder::new(
            Arc::new(StubEmbedder::new(&EmbeddingConfig::default())),
            16,
        );
        let texts = vec!["x".to_string(), "y".to_string(), "x".to_string()];
        let batch = cached.embed_batch(&texts).await.unwrap();
        assert_eq!(batch[0], batch[2]);
        assert_ne!(batch[0], batch[1]);
    }

    #[tokio::test]
    async fn eviction_keeps_results_correct() {
        let counting = Arc::new(CountingEmbedder::new());
        let cached = CachingEmbedder::new(counting.clone(), 1);

        let a1 = cached.embed("a").await.unwrap();
        cached.embed("b").await.unwrap(); // evicts "a"
        let a2 = cached.embed("a").await.unwrap();

        assert_eq!(a1, a2);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 3);
    }
}
