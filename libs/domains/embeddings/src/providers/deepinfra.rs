use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{EmbeddingError, EmbeddingResult, ensure_usable};
use crate::provider::{EmbeddingProvider, EmbeddingProviderType};

pub const DEFAULT_DEEPINFRA_BASE_URL: &str = "https://api.deepinfra.com/v1";
pub const DEFAULT_DEEPINFRA_MODEL: &str = "Qwen/Qwen3-Embedding-4B";

/// DeepInfra inference API configuration
#[derive(Debug, Clone)]
pub struct DeepInfraConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl DeepInfraConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_DEEPINFRA_BASE_URL.to_string(),
            model: DEFAULT_DEEPINFRA_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/inference/{}",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Embeddings through DeepInfra's native inference endpoint
pub struct DeepInfraProvider {
    client: Client,
    config: DeepInfraConfig,
}

impl DeepInfraProvider {
    pub fn new(config: DeepInfraConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for DeepInfraProvider {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::DeepInfra
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&InferenceRequest { inputs: [text] })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api { status, body });
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        let embedding = parsed.embeddings.into_iter().next().ok_or_else(|| {
            EmbeddingError::InvalidResponse("response contained no embeddings".to_string())
        })?;

        tracing::debug!(dimension = embedding.len(), "DeepInfra embedding received");
        ensure_usable(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_server::spawn_json_server;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_endpoint_joins_base_and_model() {
        let config = DeepInfraConfig::new("key").with_base_url("http://localhost:9000/v1/");
        assert_eq!(
            config.endpoint(),
            "http://localhost:9000/v1/inference/Qwen/Qwen3-Embedding-4B"
        );
    }

    #[tokio::test]
    async fn test_embed_reads_first_embedding() {
        let base = spawn_json_server(
            "/inference/{*model}",
            StatusCode::OK,
            json!({ "embeddings": [[0.1, 0.2, 0.3]], "input_tokens": 3 }),
        )
        .await;
        let provider = DeepInfraProvider::new(DeepInfraConfig::new("key").with_base_url(base));

        let vector = provider.embed("robotics club").await.unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_embed_surfaces_api_errors() {
        let base = spawn_json_server(
            "/inference/{*model}",
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": "rate limited" }),
        )
        .await;
        let provider = DeepInfraProvider::new(DeepInfraConfig::new("key").with_base_url(base));

        let err = provider.embed("robotics").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_embed_rejects_missing_embeddings() {
        let base = spawn_json_server(
            "/inference/{*model}",
            StatusCode::OK,
            json!({ "embeddings": [] }),
        )
        .await;
        let provider = DeepInfraProvider::new(DeepInfraConfig::new("key").with_base_url(base));

        let err = provider.embed("robotics").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_embed_rejects_blank_text_without_calling_api() {
        let provider = DeepInfraProvider::new(
            DeepInfraConfig::new("key").with_base_url("http://127.0.0.1:1"),
        );
        assert!(matches!(
            provider.embed("   ").await,
            Err(EmbeddingError::EmptyInput)
        ));
    }
}
