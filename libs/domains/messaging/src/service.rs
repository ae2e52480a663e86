use chrono::{SubsecRound, Utc};
use database::{ChangeFeed, FeedSubscription};
use domain_profiles::{ProfileCard, ProfileDirectory};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{MessagingError, MessagingResult};
use crate::models::{
    Conversation, ConversationSummary, MAX_MESSAGE_CHARS, Message, MessageView,
};
use crate::repository::MessagingRepository;

pub const DEFAULT_HISTORY_LIMIT: u64 = 200;
pub const MAX_HISTORY_LIMIT: u64 = 200;

/// Two-party conversations with a live per-conversation feed
pub struct MessagingService<R: MessagingRepository> {
    repository: Arc<R>,
    directory: Arc<dyn ProfileDirectory>,
    feed: ChangeFeed<Message>,
}

impl<R: MessagingRepository> Clone for MessagingService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            directory: Arc::clone(&self.directory),
            feed: self.feed.clone(),
        }
    }
}

impl<R: MessagingRepository> MessagingService<R> {
    pub fn new(repository: R, directory: Arc<dyn ProfileDirectory>) -> Self {
        Self {
            repository: Arc::new(repository),
            directory,
            feed: ChangeFeed::new(),
        }
    }

    /// Conversation between `user_id` and `other_user_id`, created on first use.
    ///
    /// Either member gets the same conversation, whichever side asks first.
    pub async fn ensure_conversation(
        &self,
        user_id: Uuid,
        other_user_id: Uuid,
    ) -> MessagingResult<Conversation> {
        if user_id == other_user_id {
            return Err(MessagingError::SelfConversation);
        }

        self.repository
            .ensure_conversation(Conversation::between(user_id, other_user_id))
            .await
    }

    /// Every conversation of `user_id` with the other member's card.
    pub async fn list_conversations(
        &self,
        user_id: Uuid,
    ) -> MessagingResult<Vec<ConversationSummary>> {
        let conversations = self.repository.conversations_for(user_id).await?;

        let others: Vec<Uuid> = conversations
            .iter()
            .filter_map(|c| c.other(user_id))
            .collect();
        let cards: HashMap<Uuid, ProfileCard> = self
            .directory
            .cards(others)
            .await?
            .into_iter()
            .map(|card| (card.user_id, card))
            .collect();

        Ok(conversations
            .into_iter()
            .filter_map(|c| {
                let other = c.other(user_id)?;
                Some(ConversationSummary {
                    conversation_id: c.id,
                    created_at: c.created_at,
                    other_user: cards
                        .get(&other)
                        .cloned()
                        .unwrap_or_else(|| ProfileCard::blank(other)),
                })
            })
            .collect())
    }

    /// Append a message and publish it to viewers of the conversation.
    ///
    /// The body is stored as sent; only the emptiness check trims it.
    pub async fn send(
        &self,
        conversation_id: Uuid,
        sender: Uuid,
        text: String,
    ) -> MessagingResult<Message> {
        if text.trim().is_empty() {
            return Err(MessagingError::EmptyMessage);
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(MessagingError::InvalidInput(format!(
                "Message exceeds {} characters",
                MAX_MESSAGE_CHARS
            )));
        }

        self.authorize(conversation_id, sender).await?;

        let message = self
            .repository
            .insert_message(Message {
                id: Uuid::now_v7(),
                conversation_id,
                sender_user_id: sender,
                body: text,
                // Stored with microsecond precision
                created_at: Utc::now().trunc_subsecs(6),
            })
            .await?;

        let delivered = self.feed.publish(conversation_id, message.clone()).await;
        tracing::info!(
            conversation_id = %conversation_id,
            message_id = %message.id,
            delivered,
            "Message sent"
        );

        Ok(message)
    }

    /// Most recent messages, oldest first; `limit` is clamped to 1-200.
    pub async fn history(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
        limit: Option<u64>,
    ) -> MessagingResult<Vec<MessageView>> {
        self.authorize(conversation_id, requester).await?;

        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        let messages = self
            .repository
            .recent_messages(conversation_id, limit)
            .await?;

        Ok(messages
            .into_iter()
            .map(|m| MessageView::for_viewer(m, requester))
            .collect())
    }

    /// Live inserts for a conversation the requester belongs to.
    pub async fn subscribe(
        &self,
        conversation_id: Uuid,
        requester: Uuid,
    ) -> MessagingResult<FeedSubscription<Message>> {
        self.authorize(conversation_id, requester).await?;
        Ok(self.feed.subscribe(conversation_id).await)
    }

    async fn authorize(&self, conversation_id: Uuid, user_id: Uuid) -> MessagingResult<Conversation> {
        let conversation = self
            .repository
            .get_conversation(conversation_id)
            .await?
            .ok_or(MessagingError::NotFound(conversation_id))?;

        if !conversation.is_member(user_id) {
            tracing::warn!(
                conversation_id = %conversation_id,
                user_id = %user_id,
                "Rejected non-member"
            );
            return Err(MessagingError::NotAMember(conversation_id));
        }

        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryMessagingRepository, MockMessagingRepository};
    use crate::thread::ThreadBuffer;
    use domain_embeddings::HashingProvider;
    use domain_profiles::{
        InMemoryProfileRepository, ProfileService, ProfileUpdate,
    };

    fn profiles() -> ProfileService<InMemoryProfileRepository> {
        ProfileService::new(
            InMemoryProfileRepository::new(),
            Arc::new(HashingProvider::default()),
        )
    }

    fn service() -> MessagingService<InMemoryMessagingRepository> {
        MessagingService::new(InMemoryMessagingRepository::new(), Arc::new(profiles()))
    }

    #[tokio::test]
    async fn test_ensure_is_symmetric() {
        let service = service();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

        let ab = service.ensure_conversation(a, b).await.unwrap();
        let ba = service.ensure_conversation(b, a).await.unwrap();
        assert_eq!(ab.id, ba.id);
    }

    #[tokio::test]
    async fn test_concurrent_ensure_converges() {
        let service = service();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                let (me, other) = if i % 2 == 0 { (a, b) } else { (b, a) };
                tokio::spawn(async move { service.ensure_conversation(me, other).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn test_self_conversation_rejected() {
        let service = service();
        let me = Uuid::now_v7();
        let result = service.ensure_conversation(me, me).await;
        assert!(matches!(result, Err(MessagingError::SelfConversation)));
    }

    #[tokio::test]
    async fn test_history_returns_sends_in_order() {
        let service = service();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let conversation = service.ensure_conversation(a, b).await.unwrap();

        let mut sent = Vec::new();
        for (sender, body) in [(a, "m1"), (b, "m2"), (a, "m3")] {
            sent.push(
                service
                    .send(conversation.id, sender, body.into())
                    .await
                    .unwrap(),
            );
        }

        let history = service.history(conversation.id, a, None).await.unwrap();
        let ids: Vec<Uuid> = history.iter().map(|v| v.message.id).collect();
        assert_eq!(ids, sent.iter().map(|m| m.id).collect::<Vec<_>>());
        assert_eq!(
            history.iter().map(|v| v.mine).collect::<Vec<_>>(),
            vec![true, false, true]
        );
    }

    #[tokio::test]
    async fn test_history_limit_keeps_most_recent() {
        let service = service();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let conversation = service.ensure_conversation(a, b).await.unwrap();

        for i in 0..5 {
            service
                .send(conversation.id, a, format!("m{i}"))
                .await
                .unwrap();
        }

        let history = service.history(conversation.id, b, Some(2)).await.unwrap();
        let bodies: Vec<_> = history.iter().map(|v| v.message.body.as_str()).collect();
        assert_eq!(bodies, vec!["m3", "m4"]);
    }

    #[tokio::test]
    async fn test_empty_and_oversized_messages_rejected() {
        let service = service();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let conversation = service.ensure_conversation(a, b).await.unwrap();

        let empty = service.send(conversation.id, a, " \n\t ".into()).await;
        assert!(matches!(empty, Err(MessagingError::EmptyMessage)));

        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        let oversized = service.send(conversation.id, a, long).await;
        assert!(matches!(oversized, Err(MessagingError::InvalidInput(_))));

        assert!(service.history(conversation.id, a, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_body_is_stored_verbatim() {
        let service = service();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let conversation = service.ensure_conversation(a, b).await.unwrap();

        let message = service
            .send(conversation.id, a, "  spaced out  ".into())
            .await
            .unwrap();
        assert_eq!(message.body, "  spaced out  ");
    }

    #[tokio::test]
    async fn test_non_member_cannot_send_read_or_subscribe() {
        let service = service();
        let (a, b, outsider) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
        let conversation = service.ensure_conversation(a, b).await.unwrap();

        let send = service.send(conversation.id, outsider, "hi".into()).await;
        assert!(matches!(send, Err(MessagingError::NotAMember(_))));

        let history = service.history(conversation.id, outsider, None).await;
        assert!(matches!(history, Err(MessagingError::NotAMember(_))));

        let subscribe = service.subscribe(conversation.id, outsider).await;
        assert!(matches!(subscribe, Err(MessagingError::NotAMember(_))));
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_not_found() {
        let mut mock = MockMessagingRepository::new();
        mock.expect_get_conversation().returning(|_| Ok(None));
        mock.expect_insert_message().never();

        let service = MessagingService::new(mock, Arc::new(profiles()));
        let result = service.send(Uuid::now_v7(), Uuid::now_v7(), "hi".into()).await;
        assert!(matches!(result, Err(MessagingError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_feed_copy_and_optimistic_append_converge() {
        let service = service();
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let conversation = service.ensure_conversation(a, b).await.unwrap();

        let mut sender_view = ThreadBuffer::new();
        let mut feed = service.subscribe(conversation.id, a).await.unwrap();

        let sent = service
            .send(conversation.id, a, "hello".into())
            .await
            .unwrap();
        assert!(sender_view.merge(sent.clone()));

        let echoed = feed.recv().await.unwrap();
        assert_eq!(echoed.id, sent.id);
        assert!(!sender_view.merge(echoed));
        assert_eq!(sender_view.len(), 1);
    }

    #[tokio::test]
    async fn test_list_conversations_carries_other_member_card() {
        let profiles = profiles();
        let (a, b, c) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
        profiles
            .update_profile(
                b,
                ProfileUpdate {
                    name: Some("Bea".into()),
                    image_url: Some("https://img.example/bea.png".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let service =
            MessagingService::new(InMemoryMessagingRepository::new(), Arc::new(profiles));
        service.ensure_conversation(a, b).await.unwrap();
        service.ensure_conversation(c, a).await.unwrap();

        let list = service.list_conversations(a).await.unwrap();
        assert_eq!(list.len(), 2);

        let with_b = list.iter().find(|s| s.other_user.user_id == b).unwrap();
        assert_eq!(with_b.other_user.name, "Bea");

        // No profile yet: blank card
        let with_c = list.iter().find(|s| s.other_user.user_id == c).unwrap();
        assert_eq!(with_c.other_user.name, "");
    }
}
