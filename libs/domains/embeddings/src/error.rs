use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Cannot embed empty text")]
    EmptyInput,

    #[error("Embedding configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("Embedding request timed out after {0:?}")]
    Timeout(Duration),
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

impl From<core_config::ConfigError> for EmbeddingError {
    fn from(err: core_config::ConfigError) -> Self {
        EmbeddingError::Config(err.to_string())
    }
}

/// Reject vectors that would silently rank as "no match".
pub(crate) fn ensure_usable(vector: Vec<f32>) -> EmbeddingResult<Vec<f32>> {
    if vector.is_empty() {
        return Err(EmbeddingError::InvalidResponse(
            "embedding is empty".to_string(),
        ));
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(EmbeddingError::InvalidResponse(
            "embedding contains non-finite values".to_string(),
        ));
    }
    if vector.iter().all(|v| *v == 0.0) {
        return Err(EmbeddingError::InvalidResponse(
            "embedding is all zeros".to_string(),
        ));
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_usable_rejects_degenerate_vectors() {
        assert!(matches!(
            ensure_usable(vec![]),
            Err(EmbeddingError::InvalidResponse(_))
        ));
        assert!(matches!(
            ensure_usable(vec![0.0, 0.0]),
            Err(EmbeddingError::InvalidResponse(_))
        ));
        assert!(matches!(
            ensure_usable(vec![1.0, f32::NAN]),
            Err(EmbeddingError::InvalidResponse(_))
        ));
        assert_eq!(ensure_usable(vec![0.0, 0.5]).unwrap(), vec![0.0, 0.5]);
    }
}
