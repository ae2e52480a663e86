//! Bearer-token authentication.
//!
//! Tokens are minted by the external identity service with a shared HS256
//! secret. This crate only verifies them and exposes the claims.
//!
//! ```ignore
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//! let protected = Router::new()
//!     .route("/search", post(search))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims};
pub use middleware::jwt_auth_middleware;
