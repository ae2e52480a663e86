use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::MessagingResult;
use crate::models::{Conversation, Message};

/// Repository trait for conversations and their messages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingRepository: Send + Sync {
    /// Find the conversation for `candidate.pair_key`, inserting `candidate`
    /// if there is none. Concurrent calls for one pair return the same row.
    async fn ensure_conversation(&self, candidate: Conversation) -> MessagingResult<Conversation>;

    async fn get_conversation(&self, id: Uuid) -> MessagingResult<Option<Conversation>>;

    /// Conversations `user_id` belongs to, newest first
    async fn conversations_for(&self, user_id: Uuid) -> MessagingResult<Vec<Conversation>>;

    async fn insert_message(&self, message: Message) -> MessagingResult<Message>;

    /// The most recent `limit` messages, returned in ascending order
    async fn recent_messages(
        &self,
        conversation_id: Uuid,
        limit: u64,
    ) -> MessagingResult<Vec<Message>>;
}

#[derive(Debug, Default)]
struct Store {
    conversations: HashMap<Uuid, Conversation>,
    by_pair: HashMap<String, Uuid>,
    messages: HashMap<Uuid, Vec<Message>>,
}

/// In-memory implementation of MessagingRepository (for development/testing)
///
/// The write lock makes find-or-create atomic.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMessagingRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryMessagingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagingRepository for InMemoryMessagingRepository {
    async fn ensure_conversation(&self, candidate: Conversation) -> MessagingResult<Conversation> {
        let mut store = self.store.write().await;

        if let Some(existing) = store
            .by_pair
            .get(&candidate.pair_key)
            .and_then(|id| store.conversations.get(id))
        {
            return Ok(existing.clone());
        }

        store
            .by_pair
            .insert(candidate.pair_key.clone(), candidate.id);
        store.conversations.insert(candidate.id, candidate.clone());
        tracing::info!(conversation_id = %candidate.id, "Created conversation");
        Ok(candidate)
    }

    async fn get_conversation(&self, id: Uuid) -> MessagingResult<Option<Conversation>> {
        let store = self.store.read().await;
        Ok(store.conversations.get(&id).cloned())
    }

    async fn conversations_for(&self, user_id: Uuid) -> MessagingResult<Vec<Conversation>> {
        let store = self.store.read().await;
        let mut conversations: Vec<Conversation> = store
            .conversations
            .values()
            .filter(|c| c.is_member(user_id))
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(conversations)
    }

    async fn insert_message(&self, message: Message) -> MessagingResult<Message> {
        let mut store = self.store.write().await;
        let thread = store.messages.entry(message.conversation_id).or_default();

        let key = message.order_key();
        let position = thread.partition_point(|m| m.order_key() <= key);
        thread.insert(position, message.clone());
        Ok(message)
    }

    async fn recent_messages(
        &self,
        conversation_id: Uuid,
        limit: u64,
    ) -> MessagingResult<Vec<Message>> {
        let store = self.store.read().await;
        let thread = store
            .messages
            .get(&conversation_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let start = thread.len().saturating_sub(limit as usize);
        Ok(thread[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(conversation_id: Uuid, body: &str) -> Message {
        Message {
            id: Uuid::now_v7(),
            conversation_id,
            sender_user_id: Uuid::nil(),
            body: body.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ensure_returns_first_conversation_for_pair() {
        let repo = InMemoryMessagingRepository::new();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

        let first = repo
            .ensure_conversation(Conversation::between(a, b))
            .await
            .unwrap();
        let second = repo
            .ensure_conversation(Conversation::between(b, a))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.conversations_for(a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recent_messages_keeps_tail_in_order() {
        let repo = InMemoryMessagingRepository::new();
        let conversation_id = Uuid::now_v7();

        for body in ["m1", "m2", "m3", "m4"] {
            repo.insert_message(message(conversation_id, body))
                .await
                .unwrap();
        }

        let tail = repo.recent_messages(conversation_id, 2).await.unwrap();
        let bodies: Vec<_> = tail.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["m3", "m4"]);

        assert!(
            repo.recent_messages(Uuid::now_v7(), 10)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_conversations_for_filters_members() {
        let repo = InMemoryMessagingRepository::new();
        let (a, b, c) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());

        repo.ensure_conversation(Conversation::between(a, b))
            .await
            .unwrap();
        repo.ensure_conversation(Conversation::between(a, c))
            .await
            .unwrap();

        assert_eq!(repo.conversations_for(a).await.unwrap().len(), 2);
        assert_eq!(repo.conversations_for(b).await.unwrap().len(), 1);
        assert!(repo.conversations_for(Uuid::now_v7()).await.unwrap().is_empty());
    }
}
