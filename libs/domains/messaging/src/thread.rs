//! Client-side view of one conversation.
//!
//! A sender appends its own message optimistically and later receives the
//! same message again from the live feed; history reloads overlap with both.
//! [`ThreadBuffer::merge`] makes all of these converge on one ordered list.

use std::collections::HashSet;
use uuid::Uuid;

use crate::models::Message;

#[derive(Debug, Clone, Default)]
pub struct ThreadBuffer {
    messages: Vec<Message>,
    seen: HashSet<Uuid>,
}

impl ThreadBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_history(history: impl IntoIterator<Item = Message>) -> Self {
        let mut buffer = Self::new();
        buffer.extend(history);
        buffer
    }

    /// Insert `message` in `(created_at, id)` order. Returns false for a duplicate id.
    pub fn merge(&mut self, message: Message) -> bool {
        if !self.seen.insert(message.id) {
            return false;
        }

        let key = message.order_key();
        let position = self.messages.partition_point(|m| m.order_key() <= key);
        self.messages.insert(position, message);
        true
    }

    /// Merge many; returns how many were new.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) -> usize {
        messages
            .into_iter()
            .map(|m| self.merge(m))
            .filter(|added| *added)
            .count()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
