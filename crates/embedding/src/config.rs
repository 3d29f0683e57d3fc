use serde::{Deserialize, Serialize};

/// Runtime configuration selecting the embedding provider and how vectors
/// are post-processed.
///
/// # Example
/// ```
/// use embedding::EmbeddingConfig;
///
/// let cfg = EmbeddingConfig {
///     mode: "api".into(),
///     api_url: Some("https://router.huggingface.co/hf-inference/models/BAAI/bge-large-en-v1.5/pipeline/feature-extraction".into()),
///     api_token: Some("hf_xxx".into()),
///     ..Default::default()
/// };
/// assert_eq!(cfg.mode, "api");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider selector: `"stub"` (deterministic, offline) or `"api"`
    /// (remote HTTP feature-extraction endpoint).
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Friendly model label, surfaced in logs and readiness output.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Vector dimension produced by the stub provider. API-mode vectors
    /// keep whatever dimension the endpoint returns.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// L2-normalize vectors before returning them (recommended for cosine
    /// similarity).
    #[serde(default = "default_true")]
    pub normalize: bool,

    /// Feature-extraction endpoint; required when `mode` is `"api"`.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Bearer token for the endpoint.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Overall API request timeout in seconds.
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,

    /// Capacity of the per-process embedding LRU cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            model_name: default_model_name(),
            dimension: default_dimension(),
            normalize: true,
            api_url: None,
            api_token: None,
            api_timeout_secs: default_api_timeout_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl EmbeddingConfig {
    /// Apply `FILTERSENSE_EMBEDDING_*` environment overrides on top of the
    /// loaded configuration. Lets deployments keep tokens out of files.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("FILTERSENSE_EMBEDDING_API_URL") {
            if !url.is_empty() {
                self.api_url = Some(url);
            }
        }
        if let Ok(token) = std::env::var("FILTERSENSE_EMBEDDING_API_TOKEN") {
            if !token.is_empty() {
                self.api_token = Some(token);
            }
        }
        self
    }
}

fn default_mode() -> String {
    "stub".to_string()
}

fn default_model_name() -> String {
    "bge-large-en-v1.5".to_string()
}

fn default_dimension() -> usize {
    384
}

fn default_true() -> bool {
    true
}

fn default_api_timeout_secs() -> u64 {
    30
}

fn default_cache_capacity() -> usize {
    4096
}
