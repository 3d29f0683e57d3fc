use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use filtersense::SchemaId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Query resolution request
#[derive(Debug, Deserialize)]
pub struct ResolveQueryRequest {
    pub schema_id: SchemaId,
    pub query: String,
}

/// Query resolution response.
///
/// `filters` holds only the filter types whose best option cleared the
/// schema threshold; an empty object means nothing matched confidently,
/// which is a success, not an error.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveQueryResponse {
    pub filters: BTreeMap<String, String>,
}

/// Resolve a free-text query against a registered schema
/// (unauthenticated by design).
pub async fn resolve_query(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ResolveQueryRequest>,
) -> ServerResult<impl IntoResponse> {
    let extractor = state.extractor()?;
    let filters = extractor
        .resolve(&state.registry, &request.schema_id, &request.query)
        .await?;

    tracing::debug!(
        schema_id = %request.schema_id,
        matched = filters.len(),
        "query resolved"
    );

    Ok(Json(ResolveQueryResponse { filters }))
}
