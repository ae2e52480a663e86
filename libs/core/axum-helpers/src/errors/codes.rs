//! Type-safe error codes for API responses.
//!
//! Each code carries a client-facing identifier, an integer for logs and
//! dashboards, a default message and the HTTP status it renders with.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::CapacityExceeded;
//! assert_eq!(code.as_str(), "CAPACITY_EXCEEDED");
//! assert_eq!(code.code(), 1101);
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1099)
    /// Request validation failed
    ValidationError,
    /// Invalid UUID format in path or query parameter
    InvalidUuid,
    /// Request body could not be parsed
    JsonExtraction,
    NotFound,
    /// Missing or invalid bearer token
    Unauthorized,
    Forbidden,
    Conflict,
    UnprocessableEntity,

    // Domain errors (1100-1199)
    /// Per-user attribute limit reached
    CapacityExceeded,
    /// Core profile attributes cannot be removed
    CoreKeyProtected,
    /// Caller is not a member of the conversation
    NotAMember,
    /// Embedding backend failed or timed out
    EmbeddingUnavailable,

    // Server errors (1500-1599)
    InternalError,
    ServiceUnavailable,

    // Database errors (2000-2999)
    DatabaseError,
    DatabasePoolTimeout,
    DatabaseRecordNotFound,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",
            Self::CoreKeyProtected => "CORE_KEY_PROTECTED",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::EmbeddingUnavailable => "EMBEDDING_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabasePoolTimeout => "DATABASE_POOL_TIMEOUT",
            Self::DatabaseRecordNotFound => "DATABASE_RECORD_NOT_FOUND",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1099: client errors
    /// - 1100-1199: domain rule violations
    /// - 1500-1599: server errors
    /// - 2000-2999: database errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::Conflict => 1008,
            Self::UnprocessableEntity => 1009,

            Self::CapacityExceeded => 1101,
            Self::CoreKeyProtected => 1102,
            Self::NotAMember => 1103,
            Self::EmbeddingUnavailable => 1104,

            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1503,

            Self::DatabaseError => 2003,
            Self::DatabasePoolTimeout => 2013,
            Self::DatabaseRecordNotFound => 2001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::Conflict => "Resource already exists",
            Self::UnprocessableEntity => "Request cannot be processed",
            Self::CapacityExceeded => "Attribute limit reached",
            Self::CoreKeyProtected => "Core attributes cannot be removed",
            Self::NotAMember => "Not a member of this conversation",
            Self::EmbeddingUnavailable => "Embedding service is unavailable",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "Database error occurred",
            Self::DatabasePoolTimeout => "Database connection pool timed out",
            Self::DatabaseRecordNotFound => "Database record not found",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError | Self::InvalidUuid | Self::JsonExtraction => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound | Self::DatabaseRecordNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::CoreKeyProtected | Self::NotAMember => StatusCode::FORBIDDEN,
            Self::Conflict => StatusCode::CONFLICT,
            Self::UnprocessableEntity | Self::CapacityExceeded => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::EmbeddingUnavailable | Self::ServiceUnavailable | Self::DatabasePoolTimeout => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
