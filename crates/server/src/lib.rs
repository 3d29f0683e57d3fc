//! Filtersense Server - HTTP REST API for semantic filter extraction
//!
//! This crate exposes the filtersense engine over HTTP:
//!
//! - **Schema Registration**: Register filter vocabularies and receive an
//!   opaque schema id (bearer token required)
//! - **Query Resolution**: Resolve free-text queries into filter mappings
//!   (unauthenticated by design)
//! - **Health**: Liveness and readiness probes; readiness tracks the
//!   one-time embedding provider warm-up
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! ## Public
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (503 until warm-up completes)
//! - `POST /get_token` - Exchange the static credential pair for a token
//! - `POST /api/v1/query` - Resolve a query against a schema
//!
//! ## Protected (Bearer Token)
//!
//! - `POST /api/v1/schemas` - Register a filter schema

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server, warm_up_embedder};
pub use state::ServerState;
