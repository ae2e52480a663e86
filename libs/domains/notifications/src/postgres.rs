use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_profiles::entity::profile;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::notification;
use crate::error::NotificationResult;
use crate::models::Notification;
use crate::repository::NotificationRepository;

/// Counters live on the `profiles` row so they can be updated in the same
/// transaction as the notification insert.
pub struct PgNotificationRepository {
    db: DatabaseConnection,
}

impl PgNotificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert_many(
        &self,
        triggering_user_id: Uuid,
        recipients: Vec<Uuid>,
        query_text: String,
    ) -> NotificationResult<Vec<Notification>> {
        if recipients.is_empty() {
            return Ok(Vec::new());
        }

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let mut inserted = Vec::with_capacity(recipients.len());
        for recipient in &recipients {
            let model = notification::new_row(*recipient, triggering_user_id, &query_text, now)
                .insert(&txn)
                .await?;
            inserted.push(Notification::from(model));
        }

        profile::Entity::update_many()
            .col_expr(
                profile::Column::UnreadNotificationCount,
                Expr::cust("unread_notification_count + 1"),
            )
            .col_expr(profile::Column::SearchCount, Expr::cust("search_count + 1"))
            .filter(profile::Column::UserId.is_in(recipients))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(
            triggering_user_id = %triggering_user_id,
            count = inserted.len(),
            "Inserted notifications"
        );
        Ok(inserted)
    }

    async fn mark_read(&self, user_id: Uuid) -> NotificationResult<DateTime<Utc>> {
        let now = Utc::now();

        // Single upsert statement: reset and timestamp land together
        let mut row = profile::blank(user_id);
        row.unread_notification_count = Set(0);
        row.notifications_read_at = Set(Some(now.into()));

        profile::Entity::insert(row)
            .on_conflict(
                OnConflict::column(profile::Column::UserId)
                    .update_columns([
                        profile::Column::UnreadNotificationCount,
                        profile::Column::NotificationsReadAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        tracing::debug!(user_id = %user_id, "Marked notifications read");
        Ok(now)
    }

    async fn list(&self, user_id: Uuid, limit: u64) -> NotificationResult<Vec<Notification>> {
        let models = notification::Entity::find()
            .filter(notification::Column::RecipientUserId.eq(user_id))
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn unread_count(&self, user_id: Uuid) -> NotificationResult<i32> {
        let count = profile::Entity::find_by_id(user_id)
            .select_only()
            .column(profile::Column::UnreadNotificationCount)
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;

        Ok(count.unwrap_or(0))
    }
}
