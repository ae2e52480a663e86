//! Shared application state.

use axum_helpers::JwtAuth;
use domain_embeddings::EmbeddingProvider;
use std::sync::Arc;

/// Cloned into route constructors; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    pub jwt_auth: JwtAuth,
    /// Configured embedder, already wrapped in a timeout
    pub embedder: Arc<dyn EmbeddingProvider>,
}
