use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use filtersense::{FilterOption, FilterSchema, FilterType, SchemaId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Schema registration request.
///
/// `filters` maps filter-type name → (option key → description).
/// serde_json's `preserve_order` feature keeps the declared option order,
/// which extraction uses to break exact similarity ties.
#[derive(Debug, Deserialize)]
pub struct RegisterSchemaRequest {
    pub filters: serde_json::Map<String, Value>,

    /// Acceptance threshold on the cosine scale; defaults to 0.45.
    #[serde(default)]
    pub threshold: Option<f32>,
}

/// Schema registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterSchemaResponse {
    pub schema_id: SchemaId,
}

/// Register a filter schema (authenticated).
///
/// Validation happens before any registry mutation: a rejected request
/// leaves the registry untouched. Every successful registration creates a
/// brand-new schema, even when the content matches an earlier one.
pub async fn register_schema(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RegisterSchemaRequest>,
) -> ServerResult<impl IntoResponse> {
    // Fail fast while the provider is still warming up, matching query
    // resolution behavior.
    state.embedder()?;

    let filter_types = parse_filter_types(request.filters)?;
    let schema = FilterSchema::new(filter_types, request.threshold)?;

    let schema_id = state.registry.insert(schema);
    tracing::info!(schema_id = %schema_id, "schema registered");

    Ok(Json(RegisterSchemaResponse { schema_id }))
}

/// Lower the JSON payload into typed filter declarations, preserving
/// option order.
fn parse_filter_types(
    filters: serde_json::Map<String, Value>,
) -> Result<Vec<FilterType>, ServerError> {
    let mut filter_types = Vec::with_capacity(filters.len());
    for (name, options) in filters {
        let Value::Object(options) = options else {
            return Err(ServerError::BadRequest(format!(
                "filter type '{name}' must map options to descriptions"
            )));
        };
        let mut parsed = Vec::with_capacity(options.len());
        for (key, description) in options {
            let Value::String(description) = description else {
                return Err(ServerError::BadRequest(format!(
                    "description for option '{key}' of filter type '{name}' must be a string"
                )));
            };
            parsed.push(FilterOption { key, description });
        }
        filter_types.push(FilterType {
            name,
            options: parsed,
        });
    }
    Ok(filter_types)
}
