//! Embeddings Domain
//!
//! Turns free text into fixed-dimension vectors for the vector store and the
//! ranking engine. Every backend sits behind [`EmbeddingProvider`]; the
//! binary picks one from [`EmbeddingConfig`] and wraps it in a
//! [`TimeoutProvider`].
//!
//! ```text
//! ┌──────────────────┐
//! │ TimeoutProvider  │  ← bounded deadline
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ DeepInfra/OpenAI │  ← HTTP APIs
//! │ Hashing          │  ← local, for dev and tests
//! └──────────────────┘
//! ```
//!
//! ```rust,no_run
//! use domain_embeddings::{EmbeddingConfig, EmbeddingProvider};
//!
//! # async fn example() -> Result<(), domain_embeddings::EmbeddingError> {
//! let provider = EmbeddingConfig::hashing(384).build_provider()?;
//! let vector = provider.embed("robotics club").await?;
//! assert_eq!(vector.len(), 384);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;
pub mod similarity;

pub use config::EmbeddingConfig;
pub use error::{EmbeddingError, EmbeddingResult};
pub use provider::{EmbeddingProvider, EmbeddingProviderType};
pub use providers::{
    DeepInfraConfig, DeepInfraProvider, HashingProvider, OpenAIConfig, OpenAIProvider,
    TimeoutProvider,
};
pub use similarity::cosine_similarity;
