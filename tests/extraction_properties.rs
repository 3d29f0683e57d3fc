//! End-to-end properties of the extraction engine: registry round-trips,
//! threshold behavior, tie-breaks, and cross-schema isolation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use embedding::{EmbeddingConfig, EmbeddingError, StubEmbedder, TextEmbedder};
use filtersense::{FilterExtractor, FilterSchema, SchemaId, SchemaRegistry};

/// Embedder with hand-assigned vectors so the similarity geometry in
/// these scenarios is explicit. Texts outside the table fall onto an
/// axis orthogonal to everything food-related.
struct ScenarioEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl ScenarioEmbedder {
    fn new() -> Self {
        let entries: &[(&str, [f32; 4])] = &[
            // diet descriptions
            ("food with no animal products or dairy", [1.0, 0.1, 0.0, 0.0]),
            ("no meat, but may include dairy", [0.5, 0.85, 0.0, 0.0]),
            // price descriptions
            ("cheap meals under ten dollars", [0.0, 0.0, 1.0, 0.0]),
            ("fine dining, price is no object", [0.0, 0.0, -0.6, 0.8]),
            // queries
            ("I want something vegan", [0.97, 0.2, 0.05, 0.0]),
            ("somewhere fancy for an anniversary", [0.0, 0.1, -0.5, 0.85]),
        ];
        Self {
            vectors: entries
                .iter()
                .map(|(text, v)| (text.to_string(), v.to_vec()))
                .collect(),
        }
    }
}

#[async_trait]
impl TextEmbedder for ScenarioEmbedder {
    fn model_name(&self) -> &str {
        "scenario"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0, 0.0, 0.0, -1.0]))
    }
}

fn diet_schema(threshold: f32) -> FilterSchema {
    FilterSchema::builder()
        .filter_type(
            "diet",
            [
                ("Vegan", "food with no animal products or dairy"),
                ("Vegetarian", "no meat, but may include dairy"),
            ],
        )
        .threshold(threshold)
        .build()
        .unwrap()
}

fn price_schema() -> FilterSchema {
    FilterSchema::builder()
        .filter_type(
            "price",
            [
                ("Budget", "cheap meals under ten dollars"),
                ("Upscale", "fine dining, price is no object"),
            ],
        )
        .build()
        .unwrap()
}

#[tokio::test]
async fn vegan_query_selects_vegan_option() {
    let registry = SchemaRegistry::new();
    let id = registry.insert(diet_schema(0.45));
    let extractor = FilterExtractor::new(Arc::new(ScenarioEmbedder::new()));

    let schema = registry.lookup(&id).unwrap();
    let filters = extractor
        .extract(&schema, "I want something vegan")
        .await
        .unwrap();

    assert_eq!(filters.len(), 1);
    assert_eq!(filters.get("diet").map(String::as_str), Some("Vegan"));
}

#[tokio::test]
async fn off_topic_query_omits_every_filter_type() {
    let registry = SchemaRegistry::new();
    let id = registry.insert(diet_schema(0.45));
    let extractor = FilterExtractor::new(Arc::new(ScenarioEmbedder::new()));

    let schema = registry.lookup(&id).unwrap();
    let filters = extractor.extract(&schema, "tell me a joke").await.unwrap();

    assert!(filters.is_empty());
}

#[tokio::test]
async fn schemas_resolve_independently() {
    let registry = SchemaRegistry::new();
    let diet_id = registry.insert(diet_schema(0.45));
    let price_id = registry.insert(price_schema());
    let extractor = FilterExtractor::new(Arc::new(ScenarioEmbedder::new()));

    let query = "somewhere fancy for an anniversary";

    let diet = registry.lookup(&diet_id).unwrap();
    let diet_filters = extractor.extract(&diet, query).await.unwrap();
    let price = registry.lookup(&price_id).unwrap();
    let price_filters = extractor.extract(&price, query).await.unwrap();

    // Schema A never leaks filter types from schema B.
    assert!(!diet_filters.contains_key("price"));
    assert!(!price_filters.contains_key("diet"));
    assert_eq!(price_filters.get("price").map(String::as_str), Some("Upscale"));
}

#[tokio::test]
async fn raising_threshold_monotonically_removes_filters() {
    let extractor = FilterExtractor::new(Arc::new(ScenarioEmbedder::new()));
    let query = "I want something vegan";

    let loose = extractor.extract(&diet_schema(0.45), query).await.unwrap();
    assert!(loose.contains_key("diet"));

    // The best achievable score for this query is below 0.999.
    let strict = extractor.extract(&diet_schema(0.999), query).await.unwrap();
    assert!(strict.is_empty());
}

#[tokio::test]
async fn query_matching_a_description_wins_at_threshold_one() {
    let extractor = FilterExtractor::new(Arc::new(StubEmbedder::new(&EmbeddingConfig::default())));

    // Self-similarity is maximal regardless of provider.
    let filters = extractor
        .extract(&diet_schema(1.0), "food with no animal products or dairy")
        .await
        .unwrap();
    assert_eq!(filters.get("diet").map(String::as_str), Some("Vegan"));
}

#[tokio::test]
async fn resolution_is_deterministic_across_calls() {
    let extractor = FilterExtractor::new(Arc::new(StubEmbedder::new(&EmbeddingConfig::default())));
    let schema = diet_schema(0.0);

    let first = extractor.extract(&schema, "dinner plans").await.unwrap();
    for _ in 0..10 {
        let next = extractor.extract(&schema, "dinner plans").await.unwrap();
        assert_eq!(first, next);
    }
}

#[tokio::test]
async fn registry_ids_never_repeat_for_identical_content() {
    let registry = SchemaRegistry::new();
    let a = registry.insert(diet_schema(0.45));
    let b = registry.insert(diet_schema(0.45));

    assert_ne!(a, b);
    assert!(registry.lookup(&a).is_some());
    assert!(registry.lookup(&b).is_some());
}

#[tokio::test]
async fn unknown_schema_id_is_a_lookup_miss_not_an_empty_result() {
    let registry = SchemaRegistry::new();
    registry.insert(diet_schema(0.45));

    assert!(registry.lookup(&SchemaId::from("never-issued")).is_none());
}

#[tokio::test]
async fn shared_extractor_serves_concurrent_resolutions() {
    let registry = Arc::new(SchemaRegistry::new());
    let id = registry.insert(diet_schema(0.0));
    let extractor = Arc::new(FilterExtractor::new(Arc::new(StubEmbedder::new(
        &EmbeddingConfig::default(),
    ))));

    let mut handles = Vec::new();
    for i in 0..16 {
        let registry = registry.clone();
        let extractor = extractor.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            let schema = registry.lookup(&id).expect("schema present");
            extractor
                .extract(&schema, &format!("query number {i}"))
                .await
                .expect("extraction succeeds")
        }));
    }

    for handle in handles {
        let filters = handle.await.unwrap();
        // Threshold 0.0 with normalized stub vectors nearly always
        // accepts; what matters is that no task failed or deadlocked.
        assert!(filters.len() <= 1);
    }
}
