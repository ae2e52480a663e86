//! Profiles Domain
//!
//! Member profiles and the per-user vector store behind semantic search.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /profile, /profile/vectors, /profiles/top
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌───────────────────┐
//! │   Service   │ ──► │ EmbeddingProvider │  ← embed before the transaction
//! └──────┬──────┘     └───────────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← capacity check + write in one transaction
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Profile, VectorEntry, catalog
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_embeddings::HashingProvider;
//! use domain_profiles::{handlers, InMemoryProfileRepository, ProfileService};
//!
//! let service = ProfileService::new(
//!     InMemoryProfileRepository::new(),
//!     Arc::new(HashingProvider::default()),
//! );
//! let router = handlers::router(service);
//! ```

pub mod catalog;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use catalog::{AttributeDef, CATALOG, MAX_ATTRIBUTES_PER_USER};
pub use error::{ProfileError, ProfileResult};
pub use models::{
    AttributeInfo, Profile, ProfileCard, ProfileFields, ProfileSummary, ProfileUpdate,
    ProfileVectors, ProfileView, UpsertReport, VectorEntry, VectorItem,
};
pub use postgres::PgProfileRepository;
pub use repository::{InMemoryProfileRepository, ProfileRepository};
pub use service::{ProfileDirectory, ProfileService};
