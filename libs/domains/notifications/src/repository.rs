use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::NotificationResult;
use crate::models::Notification;

/// Repository trait for notifications and the recipients' unread counters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert one row per recipient and bump each recipient's unread and
    /// search counters, all in one transaction. Returns the inserted rows.
    async fn insert_many(
        &self,
        triggering_user_id: Uuid,
        recipients: Vec<Uuid>,
        query_text: String,
    ) -> NotificationResult<Vec<Notification>>;

    /// Set `notifications_read_at = now` and zero the counter in one step
    async fn mark_read(&self, user_id: Uuid) -> NotificationResult<DateTime<Utc>>;

    /// Newest first
    async fn list(&self, user_id: Uuid, limit: u64) -> NotificationResult<Vec<Notification>>;

    async fn unread_count(&self, user_id: Uuid) -> NotificationResult<i32>;
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    unread: i32,
    read_at: Option<DateTime<Utc>>,
    search_count: i64,
}

#[derive(Debug, Default)]
struct Store {
    notifications: Vec<Notification>,
    counters: HashMap<Uuid, Counters>,
    next_id: i64,
}

/// In-memory implementation of NotificationRepository (for development/testing)
///
/// Keeps its own per-recipient counters instead of the profile columns.
#[derive(Debug, Default, Clone)]
pub struct InMemoryNotificationRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// How often `user_id` has appeared in search results
    pub async fn search_count(&self, user_id: Uuid) -> i64 {
        let store = self.store.read().await;
        store
            .counters
            .get(&user_id)
            .map(|c| c.search_count)
            .unwrap_or(0)
    }

    pub async fn read_at(&self, user_id: Uuid) -> Option<DateTime<Utc>> {
        let store = self.store.read().await;
        store.counters.get(&user_id).and_then(|c| c.read_at)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert_many(
        &self,
        triggering_user_id: Uuid,
        recipients: Vec<Uuid>,
        query_text: String,
    ) -> NotificationResult<Vec<Notification>> {
        let mut store = self.store.write().await;
        let now = Utc::now();
        let mut inserted = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            store.next_id += 1;
            let notification = Notification {
                id: store.next_id,
                recipient_user_id: recipient,
                triggering_user_id,
                query_text: query_text.clone(),
                created_at: now,
            };
            store.notifications.push(notification.clone());

            let counters = store.counters.entry(recipient).or_default();
            counters.unread += 1;
            counters.search_count += 1;

            inserted.push(notification);
        }

        Ok(inserted)
    }

    async fn mark_read(&self, user_id: Uuid) -> NotificationResult<DateTime<Utc>> {
        let mut store = self.store.write().await;
        let now = Utc::now();
        let counters = store.counters.entry(user_id).or_default();
        counters.unread = 0;
        counters.read_at = Some(now);
        Ok(now)
    }

    async fn list(&self, user_id: Uuid, limit: u64) -> NotificationResult<Vec<Notification>> {
        let store = self.store.read().await;
        Ok(store
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn unread_count(&self, user_id: Uuid) -> NotificationResult<i32> {
        let store = self.store.read().await;
        Ok(store.counters.get(&user_id).map(|c| c.unread).unwrap_or(0))
    }
}
