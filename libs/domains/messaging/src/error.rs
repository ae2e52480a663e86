use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use domain_profiles::ProfileError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot start a conversation with yourself")]
    SelfConversation,

    #[error("Message text is required")]
    EmptyMessage,

    #[error("Not a member of conversation {0}")]
    NotAMember(Uuid),

    #[error("Conversation not found: {0}")]
    NotFound(Uuid),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type MessagingResult<T> = Result<T, MessagingError>;

impl From<MessagingError> for AppError {
    fn from(err: MessagingError) -> Self {
        match err {
            e @ (MessagingError::InvalidInput(_)
            | MessagingError::SelfConversation
            | MessagingError::EmptyMessage) => AppError::BadRequest(e.to_string()),
            e @ MessagingError::NotAMember(_) => {
                AppError::domain(ErrorCode::NotAMember, e.to_string())
            }
            MessagingError::NotFound(id) => {
                AppError::NotFound(format!("Conversation {} not found", id))
            }
            MessagingError::Internal(msg) => AppError::InternalServerError(msg),
            MessagingError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for MessagingError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for MessagingError {
    fn from(err: sea_orm::DbErr) -> Self {
        MessagingError::Database(err.to_string())
    }
}

impl From<ProfileError> for MessagingError {
    fn from(err: ProfileError) -> Self {
        MessagingError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (MessagingError::SelfConversation, StatusCode::BAD_REQUEST),
            (MessagingError::EmptyMessage, StatusCode::BAD_REQUEST),
            (
                MessagingError::InvalidInput("too long".into()),
                StatusCode::BAD_REQUEST,
            ),
            (MessagingError::NotAMember(Uuid::nil()), StatusCode::FORBIDDEN),
            (MessagingError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                MessagingError::Database("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }
}
