use async_trait::async_trait;
use std::time::Duration;

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::provider::{EmbeddingProvider, EmbeddingProviderType};

/// Bounds every `embed` call of the inner provider.
///
/// An elapsed deadline becomes [`EmbeddingError::Timeout`]; callers treat it
/// like any other embedding failure.
pub struct TimeoutProvider<P> {
    inner: P,
    timeout: Duration,
}

impl<P: EmbeddingProvider> TimeoutProvider<P> {
    pub fn new(inner: P, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for TimeoutProvider<P> {
    fn provider_type(&self) -> EmbeddingProviderType {
        self.inner.provider_type()
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        match tokio::time::timeout(self.timeout, self.inner.embed(text)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    provider = %self.inner.provider_type(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Embedding call timed out"
                );
                Err(EmbeddingError::Timeout(self.timeout))
            }
        }
    }
}
