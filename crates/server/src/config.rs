use embedding::EmbeddingConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration.
///
/// Loaded from an optional `filtersense` config file merged with
/// `FILTERSENSE__`-prefixed environment variables; embedding credentials
/// can additionally be injected via `FILTERSENSE_EMBEDDING_*`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Static credential pair authorized to register schemas
    #[serde(default = "default_auth_username")]
    pub auth_username: String,
    #[serde(default = "default_auth_password")]
    pub auth_password: String,

    /// Lifetime of issued bearer tokens in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level (tracing env-filter syntax)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            auth_username: default_auth_username(),
            auth_password: default_auth_password(),
            token_ttl_secs: default_token_ttl_secs(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from config files and environment variables.
    pub fn load() -> anyhow::Result<Self> {
        // .env is optional; ignore a missing file.
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("filtersense").required(false))
            .add_source(config::Environment::with_prefix("FILTERSENSE").separator("__"));

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;
        config.embedding = config.embedding.with_env_overrides();

        if config.auth_password == default_auth_password() {
            tracing::warn!("using the default admin password; set FILTERSENSE__AUTH_PASSWORD");
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get issued-token lifetime as Duration
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_auth_username() -> String {
    "admin".to_string()
}

fn default_auth_password() -> String {
    "adminpass".to_string()
}

fn default_token_ttl_secs() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
