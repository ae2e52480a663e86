//! Messaging Domain
//!
//! Two-party direct messages. A conversation exists at most once per
//! unordered pair of members; messages are append-only and delivered live to
//! members viewing the conversation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ensure / send / history   ┌──────────────────┐
//! │   Handlers   │ ──────────────────────────► │ MessagingService │
//! └──────┬───────┘                             └────┬────────┬────┘
//!        │ SSE                                      │        │ publish after insert
//!        │                                   ┌──────▼─────┐  │
//!        └──────────── subscribe ──────────► │ ChangeFeed │◄─┘
//!                                            └────────────┘
//! ```
//!
//! Clients merge feed deliveries into their local list with [`ThreadBuffer`],
//! which drops the echo of their own optimistic append.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod thread;

pub use error::{MessagingError, MessagingResult};
pub use models::{Conversation, ConversationSummary, Message, MessageView};
pub use postgres::PgMessagingRepository;
pub use repository::{InMemoryMessagingRepository, MessagingRepository};
pub use service::MessagingService;
pub use thread::ThreadBuffer;
