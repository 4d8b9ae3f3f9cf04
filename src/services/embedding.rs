//! Embedding provider abstraction and the OpenAI-style HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EmbeddingError};
use crate::models::EmbeddingConfig;

/// Converts one text unit into a fixed-length vector.
///
/// Document chunks and user queries go through the same provider and
/// model, which keeps them comparable in the vector space.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Number of components every returned vector has.
    fn dimension(&self) -> usize;
}

/// Request body for the `/embeddings` endpoint.
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Response from the `/embeddings` endpoint.
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible embeddings API.
///
/// Requests carry exactly one input each and are issued sequentially by
/// callers; throughput is bounded to one round trip per chunk.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbeddingClient {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::ValidationError(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            dimension: config.dimension as usize,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::Timeout
                } else {
                    EmbeddingError::RequestError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ProviderError { status, body });
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        let vector = embed_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse("empty data array".to_string()))?;

        validate_dimension(&vector, self.dimension)?;

        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Every vector leaving the provider must have exactly the configured
/// number of components.
fn validate_dimension(vector: &[f32], expected: usize) -> Result<(), EmbeddingError> {
    if vector.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_test_key<T>(f: impl FnOnce() -> T) -> T {
        // SAFETY: tests run single-threaded with respect to this var.
        unsafe { std::env::set_var(crate::models::EMBEDDING_API_KEY_VAR, "test-key") };
        f()
    }

    #[test]
    fn test_client_creation() {
        with_test_key(|| {
            let client = OpenAiEmbeddingClient::new(&EmbeddingConfig::default()).unwrap();
            assert_eq!(client.base_url(), "https://api.openai.com/v1");
            assert_eq!(client.model(), "text-embedding-3-small");
            assert_eq!(client.dimension(), 1536);
        });
    }

    #[test]
    fn test_base_url_trimming() {
        with_test_key(|| {
            let config = EmbeddingConfig {
                api_url: "http://localhost:8080/v1/".to_string(),
                ..Default::default()
            };
            let client = OpenAiEmbeddingClient::new(&config).unwrap();
            assert_eq!(client.base_url(), "http://localhost:8080/v1");
        });
    }

    #[test]
    fn test_request_shape() {
        let request = EmbedRequest {
            model: "text-embedding-3-small",
            input: "Hello world",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"], "Hello world");
    }

    #[test]
    fn test_validate_dimension() {
        assert!(validate_dimension(&[0.0; 1536], 1536).is_ok());

        let err = validate_dimension(&[0.0; 3], 1536).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 1536,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_response_shape() {
        let body = r#"{"data": [{"embedding": [0.1, 0.2, 0.3]}], "model": "text-embedding-3-small"}"#;
        let response: EmbedResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].embedding, vec![0.1, 0.2, 0.3]);
    }
}
