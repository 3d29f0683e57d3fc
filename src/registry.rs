use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::FilterSchema;

/// Opaque schema identifier, generated at registration time.
///
/// UUIDv4 under the hood, so collisions are practically impossible and
/// ids are never reused for the registry's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(String);

impl SchemaId {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SchemaId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SchemaId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Process-wide mapping from schema id to registered schema.
///
/// Append-only: there is no update or delete path, so a schema observed
/// once can never change underneath a concurrent reader. Inserts are
/// atomic with respect to lookups — a schema is visible fully or not at
/// all.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: DashMap<SchemaId, Arc<FilterSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under a freshly generated id.
    ///
    /// Always succeeds; registering content identical to a prior schema
    /// still creates a brand-new entry with its own id.
    pub fn insert(&self, schema: FilterSchema) -> SchemaId {
        let id = SchemaId::generate();
        self.schemas.insert(id.clone(), Arc::new(schema));
        tracing::debug!(schema_id = %id, total = self.schemas.len(), "schema registered");
        id
    }

    /// Fetch a registered schema. `None` for ids this registry never
    /// issued.
    pub fn lookup(&self, id: &SchemaId) -> Option<Arc<FilterSchema>> {
        self.schemas.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
