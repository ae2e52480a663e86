use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use domain_embeddings::EmbeddingError;
use domain_profiles::ProfileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SearchResult<T> = Result<T, SearchError>;

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidInput(msg) => AppError::BadRequest(msg),
            SearchError::EmbeddingUnavailable(msg) => {
                tracing::warn!("Embedding failure: {}", msg);
                AppError::domain(
                    ErrorCode::EmbeddingUnavailable,
                    ErrorCode::EmbeddingUnavailable.default_message(),
                )
            }
            SearchError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<EmbeddingError> for SearchError {
    fn from(err: EmbeddingError) -> Self {
        SearchError::EmbeddingUnavailable(err.to_string())
    }
}

impl From<ProfileError> for SearchError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::EmbeddingUnavailable(msg) => SearchError::EmbeddingUnavailable(msg),
            ProfileError::Validation(msg) => SearchError::InvalidInput(msg),
            other => SearchError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(SearchError::InvalidInput("empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(SearchError::EmbeddingUnavailable("timeout".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(SearchError::Internal("db".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_profile_errors_convert() {
        let err: SearchError = ProfileError::Database("gone".into()).into();
        assert!(matches!(err, SearchError::Internal(_)));

        let err: SearchError = EmbeddingError::EmptyInput.into();
        assert!(matches!(err, SearchError::EmbeddingUnavailable(_)));
    }
}
