//! Semantic filter extraction engine.
//!
//! `filtersense` maps free-text queries onto predefined categorical
//! filters by embedding similarity instead of keyword matching. Clients
//! register a [`FilterSchema`] — filter types, each with a fixed vocabulary
//! of options and a natural-language description per option — and resolve
//! queries against it: per filter type, the option whose description sits
//! closest to the query in embedding space is selected, but only when the
//! cosine similarity clears the schema's acceptance threshold. A filter
//! type that doesn't clear the bar is simply absent from the result;
//! absence is the signal, there is no "none" sentinel.
//!
//! The moving parts:
//!
//! - [`FilterSchema`] - immutable, validated at construction
//! - [`SchemaRegistry`] - concurrent id → schema map, append-only
//! - [`FilterExtractor`] - pure (schema, query) → filter mapping, driven
//!   by any [`embedding::TextEmbedder`]
//!
//! One embedding provider is shared read-only across every extraction
//! call, so many independent schemas are served by a single model.
//!
//! ```
//! use std::sync::Arc;
//! use embedding::{EmbeddingConfig, StubEmbedder};
//! use filtersense::{FilterExtractor, FilterSchema, SchemaRegistry};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let schema = FilterSchema::builder()
//!     .filter_type("diet", [
//!         ("Vegan", "food with no animal products or dairy"),
//!         ("Vegetarian", "no meat, but may include dairy"),
//!     ])
//!     .build()?;
//!
//! let registry = SchemaRegistry::new();
//! let id = registry.insert(schema);
//!
//! let embedder = Arc::new(StubEmbedder::new(&EmbeddingConfig::default()));
//! let extractor = FilterExtractor::new(embedder);
//!
//! let filters = extractor.resolve(&registry, &id, "no meat, but may include dairy").await?;
//! assert_eq!(filters.get("diet").map(String::as_str), Some("Vegetarian"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod registry;
pub mod schema;

pub use crate::error::{ExtractError, Result};
pub use crate::extract::FilterExtractor;
pub use crate::registry::{SchemaId, SchemaRegistry};
pub use crate::schema::{FilterOption, FilterSchema, FilterSchemaBuilder, FilterType};

/// Acceptance threshold applied when a schema is registered without one.
pub const DEFAULT_THRESHOLD: f32 = 0.45;
