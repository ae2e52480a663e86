use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{conversation, message};
use crate::error::{MessagingError, MessagingResult};
use crate::models::{Conversation, Message};
use crate::repository::MessagingRepository;

pub struct PgMessagingRepository {
    db: DatabaseConnection,
}

impl PgMessagingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_by_pair(&self, pair_key: &str) -> MessagingResult<Option<Conversation>> {
        let model = conversation::Entity::find()
            .filter(conversation::Column::PairKey.eq(pair_key))
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }
}

#[async_trait]
impl MessagingRepository for PgMessagingRepository {
    async fn ensure_conversation(&self, candidate: Conversation) -> MessagingResult<Conversation> {
        let pair_key = candidate.pair_key.clone();
        let candidate_id = candidate.id;
        let txn = self.db.begin().await?;

        // A concurrent insert of the same pair blocks here until it commits,
        // after which this insert becomes a no-op.
        let inserted = conversation::Entity::insert(conversation::ActiveModel::from(candidate))
            .on_conflict(
                OnConflict::column(conversation::Column::PairKey)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        let found = conversation::Entity::find()
            .filter(conversation::Column::PairKey.eq(pair_key.as_str()))
            .one(&txn)
            .await?;
        txn.commit().await?;

        if inserted > 0 {
            tracing::info!(conversation_id = %candidate_id, "Created conversation");
        }

        match found {
            Some(model) => Ok(model.into()),
            // Lost a race whose winner was not yet visible; look again
            None => self.find_by_pair(&pair_key).await?.ok_or_else(|| {
                MessagingError::Internal(format!("Conversation {} vanished", pair_key))
            }),
        }
    }

    async fn get_conversation(&self, id: Uuid) -> MessagingResult<Option<Conversation>> {
        let model = conversation::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn conversations_for(&self, user_id: Uuid) -> MessagingResult<Vec<Conversation>> {
        let models = conversation::Entity::find()
            .filter(
                Condition::any()
                    .add(conversation::Column::UserAId.eq(user_id))
                    .add(conversation::Column::UserBId.eq(user_id)),
            )
            .order_by_desc(conversation::Column::CreatedAt)
            .order_by_desc(conversation::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn insert_message(&self, msg: Message) -> MessagingResult<Message> {
        message::Entity::insert(message::ActiveModel::from(msg.clone()))
            .exec_without_returning(&self.db)
            .await?;
        Ok(msg)
    }

    async fn recent_messages(
        &self,
        conversation_id: Uuid,
        limit: u64,
    ) -> MessagingResult<Vec<Message>> {
        let mut models = message::Entity::find()
            .filter(message::Column::ConversationId.eq(conversation_id))
            .order_by_desc(message::Column::CreatedAt)
            .order_by_desc(message::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        models.reverse();

        Ok(models.into_iter().map(Into::into).collect())
    }
}
