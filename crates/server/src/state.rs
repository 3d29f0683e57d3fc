use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use dashmap::DashMap;
use embedding::{build_embedder, CachingEmbedder, TextEmbedder};
use filtersense::{ExtractError, FilterExtractor, SchemaRegistry};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Instant;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// A bearer token issued to an authenticated client.
#[derive(Debug, Clone)]
pub struct TokenEntry {
    pub username: String,
    pub expires_at: Instant,
}

/// Shared application state
///
/// The embedder cell starts empty and is filled exactly once by the
/// warm-up task; requests that need embeddings before that observe
/// [`ServerError::ProviderUnavailable`] instead of blocking or racing on
/// a half-built provider.
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Registered schemas (shared across requests)
    pub registry: SchemaRegistry,

    /// Issued bearer tokens: token -> entry
    tokens: DashMap<String, TokenEntry>,

    /// Shared embedding provider, set once warm-up completes
    embedder: OnceCell<Arc<dyn TextEmbedder>>,
}

impl ServerState {
    /// Create new server state. The embedding provider is not built here;
    /// call [`init_embedder`](Self::init_embedder) (the warm-up task does).
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            registry: SchemaRegistry::new(),
            tokens: DashMap::new(),
            embedder: OnceCell::new(),
        }
    }

    /// Build the configured provider without publishing it. Readiness is
    /// unaffected until [`publish_embedder`](Self::publish_embedder) runs,
    /// so the warm-up task can probe the provider first.
    pub fn build_provider(&self) -> ServerResult<Arc<dyn TextEmbedder>> {
        let provider = build_embedder(&self.config.embedding)
            .map_err(|e| ServerError::Config(e.to_string()))?;
        Ok(Arc::new(CachingEmbedder::new(
            provider,
            self.config.embedding.cache_capacity,
        )))
    }

    /// Publish a warmed provider, flipping readiness. Idempotent: a second
    /// publish leaves the already-published provider in place.
    pub fn publish_embedder(&self, provider: Arc<dyn TextEmbedder>) {
        let _ = self.embedder.set(provider);
    }

    /// Build and publish in one step, with no probe. Suitable for the stub
    /// provider and for tests; the server's warm-up path probes between
    /// the two.
    pub fn init_embedder(&self) -> ServerResult<()> {
        let provider = self.build_provider()?;
        self.publish_embedder(provider);
        Ok(())
    }

    /// Whether the embedding provider has finished warm-up.
    pub fn is_ready(&self) -> bool {
        self.embedder.get().is_some()
    }

    /// The shared provider, or `ProviderUnavailable` before warm-up. The
    /// gate is engine-level semantics, so the engine's error is raised and
    /// mapped onto the HTTP taxonomy.
    pub fn embedder(&self) -> ServerResult<Arc<dyn TextEmbedder>> {
        self.embedder
            .get()
            .cloned()
            .ok_or_else(|| ExtractError::ProviderUnavailable.into())
    }

    /// An extractor over the shared provider.
    pub fn extractor(&self) -> ServerResult<FilterExtractor> {
        Ok(FilterExtractor::new(self.embedder()?))
    }

    /// Constant-time check of the static credential pair.
    pub fn verify_credentials(&self, username: &str, password: &str) -> bool {
        let user_ok = username
            .as_bytes()
            .ct_eq(self.config.auth_username.as_bytes());
        let pass_ok = password
            .as_bytes()
            .ct_eq(self.config.auth_password.as_bytes());
        bool::from(user_ok & pass_ok)
    }

    /// Mint a fresh bearer token for `username`. Returns the token and its
    /// lifetime in seconds.
    pub fn issue_token(&self, username: &str) -> (String, u64) {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let ttl = self.config.token_ttl();
        self.tokens.insert(
            token.clone(),
            TokenEntry {
                username: username.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        (token, ttl.as_secs())
    }

    /// Resolve a bearer token to its username, dropping it if expired.
    pub fn validate_token(&self, token: &str) -> Option<String> {
        let entry = self.tokens.get(token)?;
        if entry.expires_at <= Instant::now() {
            drop(entry);
            self.tokens.remove(token);
            return None;
        }
        Some(entry.username.clone())
    }
}
