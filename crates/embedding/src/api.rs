use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::normalize::l2_normalize_in_place;
use crate::{EmbeddingConfig, EmbeddingError, TextEmbedder};

/// Remote feature-extraction provider.
///
/// Speaks the Hugging Face router/inference payload shape
/// (`{"inputs": [...]}`) and understands the common response envelopes:
/// bare vector arrays, `{"embeddings": [...]}`, and OpenAI-style
/// `{"data": [{"embedding": [...]}]}`.
///
/// Failures are hard failures for the calling request; there is no retry
/// here. Callers that want retries wrap the whole extraction call.
pub struct ApiEmbedder {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
    model_name: String,
    normalize: bool,
}

impl ApiEmbedder {
    pub fn new(cfg: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let url = cfg.api_url.clone().ok_or_else(|| {
            EmbeddingError::InvalidConfig("api_url is required for api mode".into())
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.api_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            client,
            url,
            auth_header: cfg.api_token.as_deref().map(|t| format!("Bearer {t}")),
            model_name: cfg.model_name.clone(),
            normalize: cfg.normalize,
        })
    }

    async fn request(&self, payload: Value) -> Result<Value, EmbeddingError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(header) = self.auth_header.as_deref() {
            request = request.header("Authorization", header);
        }

        let response = request.json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Endpoint { status, body });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(format!("invalid JSON: {e}")))
    }

    fn finish(&self, mut vector: Vec<f32>) -> Vec<f32> {
        if self.normalize {
            l2_normalize_in_place(&mut vector);
        }
        vector
    }
}

#[async_trait]
impl TextEmbedder for ApiEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self.request(json!({ "inputs": text })).await?;
        let mut vectors = parse_embeddings(response)?;
        let vector = vectors.pop().ok_or_else(|| {
            EmbeddingError::MalformedResponse("response contained no embeddings".into())
        })?;
        Ok(self.finish(vector))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let response = self.request(json!({ "inputs": texts })).await?;
        let vectors = parse_embeddings(response)?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::MalformedResponse(format!(
                "endpoint returned {} embeddings for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors.into_iter().map(|v| self.finish(v)).collect())
    }
}

fn parse_embeddings(value: Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_collection(embeddings);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                let mut vectors = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(mut obj) => match obj.remove("embedding") {
                            Some(embedding) => vectors.push(parse_vector(embedding)?),
                            None => {
                                return Err(EmbeddingError::MalformedResponse(
                                    "missing `embedding` field in data item".into(),
                                ))
                            }
                        },
                        _ => {
                            return Err(EmbeddingError::MalformedResponse(
                                "unexpected entry inside `data` array".into(),
                            ))
                        }
                    }
                }
                return Ok(vectors);
            }

            Err(EmbeddingError::MalformedResponse(
                "unsupported response shape".into(),
            ))
        }
        other => parse_collection(other),
    }
}

fn parse_collection(value: Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_vector).collect()
            } else {
                parse_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_vector(value: Value) -> Result<Vec<f32>, EmbeddingError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num.as_f64().map(|f| f as f32).ok_or_else(|| {
                    EmbeddingError::MalformedResponse("non-finite embedding value".into())
                }),
                other => Err(EmbeddingError::MalformedResponse(format!(
                    "embedding entries must be numbers, got {other:?}"
                ))),
            })
            .collect(),
        other => Err(EmbeddingError::MalformedResponse(format!(
            "embedding vector must be an array, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_vector() {
        let value = json!([0.1, 0.2, 0.3]);
        let vectors = parse_embeddings(value).unwrap();
        assert_eq!(vectors, vec![vec![0.1f32, 0.2, 0.3]]);
    }

    #[test]
    fn parse_batch_of_vectors() {
        let value = json!([[1.0, 0.0], [0.0, 1.0]]);
        let vectors = parse_embeddings(value).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], vec![1.0f32, 0.0]);
    }

    #[test]
    fn parse_embeddings_envelope() {
        let value = json!({ "embeddings": [[0.5, 0.5]] });
        let vectors = parse_embeddings(value).unwrap();
        assert_eq!(vectors, vec![vec![0.5f32, 0.5]]);
    }

    #[test]
    fn parse_openai_style_envelope() {
        let value = json!({ "data": [{ "embedding": [0.25, 0.75] }] });
        let vectors = parse_embeddings(value).unwrap();
        assert_eq!(vectors, vec![vec![0.25f32, 0.75]]);
    }

    #[test]
    fn parse_rejects_non_numeric_entries() {
        let value = json!([["a", "b"]]);
        assert!(parse_embeddings(value).is_err());
    }

    #[test]
    fn parse_rejects_unknown_envelope() {
        let value = json!({ "surprise": true });
        assert!(parse_embeddings(value).is_err());
    }

    #[test]
    fn new_requires_api_url() {
        let cfg = EmbeddingConfig {
            mode: "api".into(),
            ..Default::default()
        };
        assert!(ApiEmbedder::new(&cfg).is_err());
    }
}
