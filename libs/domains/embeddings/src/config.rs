use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::provider::{EmbeddingProvider, EmbeddingProviderType};
use crate::providers::{
    DEFAULT_DEEPINFRA_BASE_URL, DEFAULT_DEEPINFRA_MODEL, DEFAULT_HASHING_DIMENSION,
    DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, DeepInfraConfig, DeepInfraProvider,
    HashingProvider, OpenAIConfig, OpenAIProvider, TimeoutProvider,
};

pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Embedding backend selection and credentials.
///
/// | Variable | Default |
/// |---|---|
/// | `EMBEDDING_PROVIDER` | `deepinfra` |
/// | `DEEPINFRA_API_KEY` | required for `deepinfra` |
/// | `DEEPINFRA_BASE_URL` | `https://api.deepinfra.com/v1` |
/// | `DEEPINFRA_MODEL` | `Qwen/Qwen3-Embedding-4B` |
/// | `OPENAI_API_KEY` | required for `openai` |
/// | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
/// | `OPENAI_EMBEDDING_MODEL` | `text-embedding-3-small` |
/// | `EMBEDDING_TIMEOUT_SECS` | `30` |
/// | `EMBEDDING_DIMENSION` | `384` (hashing only) |
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderType,
    pub deepinfra_api_key: Option<String>,
    pub deepinfra_base_url: String,
    pub deepinfra_model: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub timeout: Duration,
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::DeepInfra,
            deepinfra_api_key: None,
            deepinfra_base_url: DEFAULT_DEEPINFRA_BASE_URL.to_string(),
            deepinfra_model: DEFAULT_DEEPINFRA_MODEL.to_string(),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_EMBEDDING_TIMEOUT_SECS),
            dimension: DEFAULT_HASHING_DIMENSION,
        }
    }
}

impl EmbeddingConfig {
    /// Local hashing embedder, no credentials needed.
    pub fn hashing(dimension: usize) -> Self {
        Self {
            provider: EmbeddingProviderType::Hashing,
            dimension,
            ..Default::default()
        }
    }

    /// Build the configured provider wrapped in a [`TimeoutProvider`].
    pub fn build_provider(&self) -> EmbeddingResult<Arc<dyn EmbeddingProvider>> {
        let provider: Arc<dyn EmbeddingProvider> = match self.provider {
            EmbeddingProviderType::DeepInfra => {
                let api_key = non_empty(&self.deepinfra_api_key).ok_or_else(|| {
                    EmbeddingError::Config("DEEPINFRA_API_KEY not set".to_string())
                })?;
                let config = DeepInfraConfig::new(api_key)
                    .with_base_url(&self.deepinfra_base_url)
                    .with_model(&self.deepinfra_model);
                Arc::new(TimeoutProvider::new(
                    DeepInfraProvider::new(config),
                    self.timeout,
                ))
            }
            EmbeddingProviderType::OpenAI => {
                let api_key = non_empty(&self.openai_api_key).ok_or_else(|| {
                    EmbeddingError::Config("OPENAI_API_KEY not set".to_string())
                })?;
                let config = OpenAIConfig::new(api_key)
                    .with_base_url(&self.openai_base_url)
                    .with_model(&self.openai_model);
                Arc::new(TimeoutProvider::new(
                    OpenAIProvider::new(config),
                    self.timeout,
                ))
            }
            EmbeddingProviderType::Hashing => Arc::new(TimeoutProvider::new(
                HashingProvider::new(self.dimension),
                self.timeout,
            )),
        };

        tracing::info!(
            provider = %self.provider,
            timeout_secs = self.timeout.as_secs(),
            "Embedding provider configured"
        );
        Ok(provider)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl FromEnv for EmbeddingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_provider = env_or_default("EMBEDDING_PROVIDER", "deepinfra");
        let provider = EmbeddingProviderType::from_str(raw_provider.trim()).map_err(|_| {
            ConfigError::ParseError {
                key: "EMBEDDING_PROVIDER".to_string(),
                details: format!(
                    "unknown provider '{}', expected deepinfra, openai or hashing",
                    raw_provider
                ),
            }
        })?;

        let timeout_secs = env_parse_or("EMBEDDING_TIMEOUT_SECS", DEFAULT_EMBEDDING_TIMEOUT_SECS)?;

        Ok(Self {
            provider,
            deepinfra_api_key: std::env::var("DEEPINFRA_API_KEY").ok(),
            deepinfra_base_url: env_or_default("DEEPINFRA_BASE_URL", DEFAULT_DEEPINFRA_BASE_URL),
            deepinfra_model: env_or_default("DEEPINFRA_MODEL", DEFAULT_DEEPINFRA_MODEL),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_base_url: env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            openai_model: env_or_default("OPENAI_EMBEDDING_MODEL", DEFAULT_OPENAI_MODEL),
            timeout: Duration::from_secs(timeout_secs),
            dimension: env_parse_or("EMBEDDING_DIMENSION", DEFAULT_HASHING_DIMENSION)?,
        })
    }
}
