mod deepinfra;
mod hashing;
mod openai;
mod timeout;

pub use deepinfra::{
    DEFAULT_DEEPINFRA_BASE_URL, DEFAULT_DEEPINFRA_MODEL, DeepInfraConfig, DeepInfraProvider,
};
pub use hashing::{DEFAULT_HASHING_DIMENSION, HashingProvider};
pub use openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, OpenAIConfig, OpenAIProvider};
pub use timeout::TimeoutProvider;
