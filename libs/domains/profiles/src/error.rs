use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use domain_embeddings::EmbeddingError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("A profile can hold at most {limit} attributes, this change needs {requested}")]
    CapacityExceeded { limit: usize, requested: usize },

    #[error("Core attribute '{0}' cannot be removed")]
    CoreKeyProtected(String),

    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProfileResult<T> = Result<T, ProfileError>;

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(id) => AppError::NotFound(format!("Profile {} not found", id)),
            ProfileError::Validation(msg) => AppError::BadRequest(msg),
            e @ ProfileError::CapacityExceeded { .. } => {
                AppError::domain(ErrorCode::CapacityExceeded, e.to_string())
            }
            e @ ProfileError::CoreKeyProtected(_) => {
                AppError::domain(ErrorCode::CoreKeyProtected, e.to_string())
            }
            ProfileError::EmbeddingUnavailable(msg) => {
                tracing::warn!("Embedding failure: {}", msg);
                AppError::domain(
                    ErrorCode::EmbeddingUnavailable,
                    ErrorCode::EmbeddingUnavailable.default_message(),
                )
            }
            ProfileError::Internal(msg) => AppError::InternalServerError(msg),
            ProfileError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for ProfileError {
    fn from(err: sea_orm::DbErr) -> Self {
        ProfileError::Database(err.to_string())
    }
}

impl From<EmbeddingError> for ProfileError {
    fn from(err: EmbeddingError) -> Self {
        ProfileError::EmbeddingUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ProfileError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                ProfileError::CapacityExceeded {
                    limit: 15,
                    requested: 16,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ProfileError::CoreKeyProtected("hobbies".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                ProfileError::EmbeddingUnavailable("timeout".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ProfileError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                ProfileError::Database("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_embedding_errors_collapse_to_unavailable() {
        let err: ProfileError = EmbeddingError::Timeout(std::time::Duration::from_secs(30)).into();
        assert!(matches!(err, ProfileError::EmbeddingUnavailable(_)));

        let err: ProfileError = EmbeddingError::Api {
            status: 502,
            body: "bad gateway".into(),
        }
        .into();
        assert!(matches!(err, ProfileError::EmbeddingUnavailable(_)));
    }
}
