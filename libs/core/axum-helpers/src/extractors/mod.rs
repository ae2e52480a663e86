//! Custom extractors for Axum handlers.

pub mod current_user;
pub mod uuid_path;
pub mod validated_json;

pub use current_user::CurrentUser;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
