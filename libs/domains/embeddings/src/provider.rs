use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::EmbeddingResult;

/// Backend that produced an embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmbeddingProviderType {
    DeepInfra,
    OpenAI,
    Hashing,
}

/// Trait for text embedding providers
///
/// `embed` must either return a usable vector or fail. Empty, zero and
/// malformed vectors are errors, never results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> EmbeddingProviderType;

    /// Dimension of produced vectors, when known up front
    fn dimension(&self) -> Option<usize>;

    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;
}

#[async_trait]
impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for std::sync::Arc<P> {
    fn provider_type(&self) -> EmbeddingProviderType {
        (**self).provider_type()
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }

    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        (**self).embed(text).await
    }
}
