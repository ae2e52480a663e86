//! UUID path parameter extractor.

use crate::errors::{AppError, ErrorCode};
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Single UUID path segment, rejected with `INVALID_UUID` when malformed.
///
/// ```ignore
/// async fn history(UuidPath(conversation_id): UuidPath) -> String {
///     conversation_id.to_string()
/// }
///
/// let app = Router::new().route("/dms/{conversation_id}/messages", get(history));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        Uuid::parse_str(&id).map(UuidPath).map_err(|_| {
            AppError::domain(ErrorCode::InvalidUuid, format!("Invalid UUID: {}", id)).into_response()
        })
    }
}
