//! # Axum Helpers
//!
//! Shared HTTP plumbing for findr services.
//!
//! - **[`auth`]**: bearer JWT verification and the claims middleware
//! - **[`errors`]**: [`AppError`] and the standard JSON error body
//! - **[`extractors`]**: [`CurrentUser`], [`UuidPath`], [`ValidatedJson`]
//! - **[`http`]**: CORS and security header layers
//! - **[`server`]**: router assembly, health checks, graceful shutdown

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, JwtConfig, jwt_auth_middleware};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{CurrentUser, UuidPath, ValidatedJson};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
