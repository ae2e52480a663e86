use async_trait::async_trait;
use database::{ChangeFeed, FeedSubscription};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::NotificationResult;
use crate::models::{Notification, NotificationList, ReadReceipt};
use crate::repository::NotificationRepository;

pub const DEFAULT_LIST_LIMIT: u64 = 5;
pub const MAX_LIST_LIMIT: u64 = 50;

/// Write side used by search: one notification per matched profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationFanout: Send + Sync {
    /// Returns how many notifications were written.
    async fn fanout(
        &self,
        triggering_user_id: Uuid,
        matched_user_ids: Vec<Uuid>,
        query_text: String,
    ) -> NotificationResult<usize>;
}

/// Notification center: persistence plus the per-recipient live feed
pub struct NotificationService<R: NotificationRepository> {
    repository: Arc<R>,
    feed: ChangeFeed<Notification>,
}

impl<R: NotificationRepository> Clone for NotificationService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            feed: self.feed.clone(),
        }
    }
}

impl<R: NotificationRepository> NotificationService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_feed(repository, ChangeFeed::new())
    }

    pub fn with_feed(repository: R, feed: ChangeFeed<Notification>) -> Self {
        Self {
            repository: Arc::new(repository),
            feed,
        }
    }

    pub async fn mark_read(&self, user_id: Uuid) -> NotificationResult<ReadReceipt> {
        let read_at = self.repository.mark_read(user_id).await?;
        Ok(ReadReceipt {
            read_at,
            unread_count: 0,
        })
    }

    /// Newest notifications plus the unread counter; `limit` is clamped to 1-50.
    pub async fn list(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> NotificationResult<NotificationList> {
        let limit = limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        let items = self.repository.list(user_id, limit).await?;
        let unread_count = self.repository.unread_count(user_id).await?;

        Ok(NotificationList {
            items,
            unread_count,
        })
    }

    pub async fn unread_count(&self, user_id: Uuid) -> NotificationResult<i32> {
        self.repository.unread_count(user_id).await
    }

    /// Live notifications for `user_id`, starting now.
    pub async fn subscribe(&self, user_id: Uuid) -> FeedSubscription<Notification> {
        self.feed.subscribe(user_id).await
    }
}

#[async_trait]
impl<R: NotificationRepository + 'static> NotificationFanout for NotificationService<R> {
    async fn fanout(
        &self,
        triggering_user_id: Uuid,
        matched_user_ids: Vec<Uuid>,
        query_text: String,
    ) -> NotificationResult<usize> {
        let mut seen = HashSet::new();
        let recipients: Vec<Uuid> = matched_user_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();

        if recipients.is_empty() {
            return Ok(0);
        }

        let inserted = self
            .repository
            .insert_many(triggering_user_id, recipients, query_text)
            .await?;

        // Only after commit
        for notification in &inserted {
            let delivered = self
                .feed
                .publish(notification.recipient_user_id, notification.clone())
                .await;
            tracing::debug!(
                recipient = %notification.recipient_user_id,
                delivered,
                "Published notification"
            );
        }

        Ok(inserted.len())
    }
}
