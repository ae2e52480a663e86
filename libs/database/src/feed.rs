//! Keyed change feed.
//!
//! Writers publish after their transaction commits; readers subscribe by key
//! (a recipient or conversation id) and receive every event published after
//! they subscribed. Slow readers that
//! fall behind the buffer skip the missed events and keep going.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 64;

/// Fan-out of committed changes keyed by a foreign id.
pub struct ChangeFeed<T> {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<T>>>>,
    capacity: usize,
}

impl<T> Clone for ChangeFeed<T> {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
            capacity: self.capacity,
        }
    }
}

impl<T: Clone + Send + 'static> Default for ChangeFeed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> ChangeFeed<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to events for `key`.
    pub async fn subscribe(&self, key: Uuid) -> FeedSubscription<T> {
        let mut channels = self.channels.write().await;
        let sender = channels
            .entry(key)
            .or_insert_with(|| broadcast::channel(self.capacity).0);

        FeedSubscription {
            key,
            receiver: sender.subscribe(),
        }
    }

    /// Deliver `event` to current subscribers of `key`. Returns how many received it.
    pub async fn publish(&self, key: Uuid, event: T) -> usize {
        {
            let channels = self.channels.read().await;
            match channels.get(&key) {
                Some(sender) => {
                    if let Ok(delivered) = sender.send(event) {
                        return delivered;
                    }
                }
                None => return 0,
            }
        }

        // Every receiver is gone; drop the idle channel.
        let mut channels = self.channels.write().await;
        if channels
            .get(&key)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(&key);
            debug!(%key, "Removed idle feed channel");
        }
        0
    }

    /// Number of live subscriptions for `key`.
    pub async fn subscriber_count(&self, key: Uuid) -> usize {
        self.channels
            .read()
            .await
            .get(&key)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

/// A live subscription returned by [`ChangeFeed::subscribe`].
pub struct FeedSubscription<T> {
    key: Uuid,
    receiver: broadcast::Receiver<T>,
}

impl<T: Clone> FeedSubscription<T> {
    pub fn key(&self) -> Uuid {
        self.key
    }

    /// Next event, or `None` once the feed is dropped.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(key = %self.key, skipped, "Feed subscriber lagged, skipping events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let feed: ChangeFeed<u32> = ChangeFeed::new();
        assert_eq!(feed.publish(Uuid::new_v4(), 1).await, 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_only_its_key() {
        let feed: ChangeFeed<&'static str> = ChangeFeed::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let mut sub = feed.subscribe(alice).await;
        assert_eq!(feed.publish(bob, "for bob").await, 0);
        assert_eq!(feed.publish(alice, "for alice").await, 1);

        assert_eq!(sub.recv().await, Some("for alice"));
        assert_eq!(sub.key(), alice);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_same_key() {
        let feed: ChangeFeed<u32> = ChangeFeed::new();
        let key = Uuid::new_v4();

        let mut first = feed.subscribe(key).await;
        let mut second = feed.subscribe(key).await;
        assert_eq!(feed.subscriber_count(key).await, 2);

        assert_eq!(feed.publish(key, 7).await, 2);
        assert_eq!(first.recv().await, Some(7));
        assert_eq!(second.recv().await, Some(7));
    }

    #[tokio::test]
    async fn test_dropped_subscribers_release_channel() {
        let feed: ChangeFeed<u32> = ChangeFeed::new();
        let key = Uuid::new_v4();

        drop(feed.subscribe(key).await);
        assert_eq!(feed.publish(key, 1).await, 0);
        assert_eq!(feed.subscriber_count(key).await, 0);
        assert!(feed.channels.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_to_newest() {
        let feed: ChangeFeed<u32> = ChangeFeed::with_capacity(2);
        let key = Uuid::new_v4();
        let mut sub = feed.subscribe(key).await;

        for n in 0..5 {
            feed.publish(key, n).await;
        }

        assert_eq!(sub.recv().await, Some(3));
        assert_eq!(sub.recv().await, Some(4));
    }
}
