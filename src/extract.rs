use std::collections::BTreeMap;
use std::sync::Arc;

use embedding::{cosine_similarity, TextEmbedder};

use crate::error::{ExtractError, Result};
use crate::registry::{SchemaId, SchemaRegistry};
use crate::schema::FilterSchema;

/// Pure (schema, query) → filter mapping over a shared embedding
/// provider.
///
/// The extractor holds no per-schema state, so one instance serves every
/// registered schema concurrently. All determinism comes from the
/// provider: given a fixed provider, the same schema and query always
/// resolve to the same mapping.
pub struct FilterExtractor {
    embedder: Arc<dyn TextEmbedder>,
}

impl FilterExtractor {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }

    /// Resolve `query` against `schema`.
    ///
    /// The query is embedded once and compared against every option
    /// description, one batch embedding call per filter type. Per filter
    /// type the highest-scoring option is selected; exact ties go to the
    /// first-declared option. The selection is kept only when its score
    /// reaches the schema threshold, otherwise the filter type is omitted
    /// from the result. An empty mapping is a valid outcome.
    ///
    /// Read-only: no schema or registry state is touched, and a failed
    /// embedding call aborts the whole request rather than yielding a
    /// partial mapping.
    pub async fn extract(
        &self,
        schema: &FilterSchema,
        query: &str,
    ) -> Result<BTreeMap<String, String>> {
        let query_vector = self.embedder.embed(query).await?;

        let mut selected = BTreeMap::new();
        for filter_type in schema.filter_types() {
            let descriptions: Vec<String> = filter_type
                .options
                .iter()
                .map(|option| option.description.clone())
                .collect();
            let option_vectors = self.embedder.embed_batch(&descriptions).await?;

            // Strict comparison keeps the first-declared option on ties.
            let mut best: Option<(usize, f32)> = None;
            for (idx, vector) in option_vectors.iter().enumerate() {
                let score = cosine_similarity(&query_vector, vector);
                if best.map_or(true, |(_, top)| score > top) {
                    best = Some((idx, score));
                }
            }

            if let Some((idx, score)) = best {
                let option = &filter_type.options[idx];
                if score >= schema.threshold() {
                    tracing::debug!(
                        filter_type = %filter_type.name,
                        option = %option.key,
                        score,
                        "filter accepted"
                    );
                    selected.insert(filter_type.name.clone(), option.key.clone());
                } else {
                    tracing::debug!(
                        filter_type = %filter_type.name,
                        option = %option.key,
                        score,
                        threshold = schema.threshold(),
                        "best option below threshold, filter omitted"
                    );
                }
            }
        }

        Ok(selected)
    }

    /// Resolve `query` against the schema registered under `id`.
    ///
    /// Convenience over [`extract`](Self::extract) for callers holding a
    /// registry; an id the registry never issued raises
    /// [`ExtractError::SchemaNotFound`].
    pub async fn resolve(
        &self,
        registry: &SchemaRegistry,
        id: &SchemaId,
        query: &str,
    ) -> Result<BTreeMap<String, String>> {
        let schema = registry
            .lookup(id)
            .ok_or_else(|| ExtractError::SchemaNotFound(id.to_string()))?;
        self.extract(&schema, query).await
    }
}
