//! Search Domain
//!
//! Turns a free-text query into a ranked list of profiles, each explained by
//! its best-matching attribute, and tells the matched members they were found.
//!
//! ```text
//! query ──► EmbeddingProvider ──► RankingEngine ◄── ProfileDirectory::corpus
//!                                      │
//!                                      ├──► SearchResponse
//!                                      └──► NotificationFanout (best-effort)
//! ```
//!
//! Ranking is exhaustive cosine similarity; the corpus of a closed community
//! is small enough that no index is kept.

pub mod error;
pub mod handlers;
pub mod models;
pub mod ranking;
pub mod service;

pub use error::{SearchError, SearchResult};
pub use models::{SearchMatch, SearchRequest, SearchResponse, TopChunk};
pub use ranking::RankingEngine;
pub use service::SearchService;
