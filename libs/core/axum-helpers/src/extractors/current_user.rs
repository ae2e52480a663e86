//! Authenticated principal extractor.

use crate::auth::JwtClaims;
use crate::errors::AppError;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// The caller's user id, taken from the claims the JWT middleware inserted.
///
/// Rejects with 401 when no claims are present or `sub` is not a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<JwtClaims>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".into()).into_response())?;

        Uuid::parse_str(&claims.sub).map(CurrentUser).map_err(|_| {
            AppError::Unauthorized("Token subject is not a user id".into()).into_response()
        })
    }
}
