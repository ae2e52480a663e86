//! Notifications Domain
//!
//! "You were searched for" events: one row per matched profile per search,
//! an unread counter that is reset in bulk, and a live per-recipient feed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Search Service │  ← best-effort fanout after ranking
//! └────────┬────────┘
//!          │
//! ┌────────▼────────┐     ┌────────────┐
//! │ NotificationSvc │ ──► │ ChangeFeed │  ← publish after commit
//! └────────┬────────┘     └─────┬──────┘
//!          │                    │
//! ┌────────▼────────┐     ┌─────▼──────┐
//! │   Repository    │     │ SSE stream │  ← /notifications/stream
//! └─────────────────┘     └────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_notifications::{handlers, InMemoryNotificationRepository, NotificationService};
//!
//! let service = NotificationService::new(InMemoryNotificationRepository::new());
//! let router = handlers::router(service.clone());
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{NotificationError, NotificationResult};
pub use models::{Notification, NotificationList, ReadReceipt};
pub use postgres::PgNotificationRepository;
pub use repository::{InMemoryNotificationRepository, NotificationRepository};
pub use service::{NotificationFanout, NotificationService};
