use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Token request
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Token response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Issue a bearer token for the static credential pair.
///
/// Registration is the only authenticated surface; the token returned
/// here is required by `POST /api/v1/schemas`.
pub async fn get_token(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<TokenRequest>,
) -> ServerResult<impl IntoResponse> {
    if !state.verify_credentials(&request.username, &request.password) {
        tracing::warn!(username = %request.username, "token request rejected");
        return Err(ServerError::Authentication(
            "invalid username or password".to_string(),
        ));
    }

    let (access_token, expires_in) = state.issue_token(&request.username);
    tracing::info!(username = %request.username, expires_in, "token issued");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in,
    }))
}
