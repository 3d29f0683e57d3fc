//! Server initialization and routing
//!
//! Router assembly, the middleware stack, embedding provider warm-up, and
//! graceful shutdown live here.

use crate::config::ServerConfig;
use crate::middleware::{bearer_auth, log_requests, request_id};
use crate::routes::{api_info, auth, health, not_found, query, schemas};
use crate::state::ServerState;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware.
///
/// Routes are divided into:
/// - Public: `/`, `/health`, `/ready`, `/get_token`, `/api/v1/query`
/// - Protected (bearer token): `/api/v1/schemas`
///
/// Query resolution stays public on purpose; only schema registration is
/// authenticated.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/get_token", post(auth::get_token))
        .route("/api/v1/query", post(query::resolve_query));

    let protected_routes = Router::new()
        .route("/api/v1/schemas", post(schemas::register_schema))
        .layer(from_fn_with_state(state.clone(), bearer_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(state.config.timeout_secs),
        ))
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// One-time embedding provider warm-up.
///
/// Builds the configured provider and runs a probe embedding against it,
/// so a bad endpoint or token is caught at startup rather than on the
/// first query. The provider is published — and readiness flips — only
/// once the probe succeeds; a failed build or probe leaves the server
/// unready and every embedding-dependent route answering 503.
pub async fn warm_up_embedder(state: Arc<ServerState>) {
    let started = std::time::Instant::now();
    tracing::info!(
        mode = %state.config.embedding.mode,
        model = %state.config.embedding.model_name,
        "loading embedding provider"
    );

    let provider = match state.build_provider() {
        Ok(provider) => provider,
        Err(err) => {
            tracing::error!(error = %err, "failed to build embedding provider; server stays unready");
            return;
        }
    };

    match provider.embed("warm-up probe").await {
        Ok(vector) => {
            state.publish_embedder(provider);
            tracing::info!(
                dimension = vector.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "embedding provider ready"
            );
        }
        Err(err) => {
            tracing::error!(error = %err, "warm-up probe failed; server stays unready");
        }
    }
}

/// Start the filtersense HTTP server.
///
/// Initializes logging, builds shared state, kicks off provider warm-up
/// in the background, and serves until SIGTERM or Ctrl+C.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .json()
        .init();

    let state = Arc::new(ServerState::new(config));

    // Warm-up runs off the accept path; early requests fail fast with 503
    // instead of blocking on provider construction.
    tokio::spawn(warm_up_embedder(state.clone()));

    let app = build_router(state.clone());
    let addr: SocketAddr = state.config.socket_addr()?;

    tracing::info!(
        %addr,
        timeout_secs = state.config.timeout_secs,
        cors = state.config.enable_cors,
        "starting filtersense server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("received SIGTERM, shutting down..."),
    }
}
