use chrono::{DateTime, Utc};
use domain_profiles::ProfileCard;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Order-independent key of a two-party conversation: `"{min}:{max}"`.
pub fn pair_key(a: Uuid, b: Uuid) -> String {
    let (low, high) = canonical_pair(a, b);
    format!("{}:{}", low, high)
}

pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b { (a, b) } else { (b, a) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Conversation {
    pub id: Uuid,
    pub pair_key: String,
    /// Lower of the two member ids
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn between(a: Uuid, b: Uuid) -> Self {
        let (user_a_id, user_b_id) = canonical_pair(a, b);
        Self {
            id: Uuid::now_v7(),
            pair_key: pair_key(a, b),
            user_a_id,
            user_b_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.user_a_id == user_id || self.user_b_id == user_id
    }

    /// The member that is not `user_id`
    pub fn other(&self, user_id: Uuid) -> Option<Uuid> {
        if self.user_a_id == user_id {
            Some(self.user_b_id)
        } else if self.user_b_id == user_id {
            Some(self.user_a_id)
        } else {
            None
        }
    }
}

/// Append-only; ordered by `(created_at, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn order_key(&self) -> (DateTime<Utc>, Uuid) {
        (self.created_at, self.id)
    }
}

/// A message as shown to one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: Message,
    pub mine: bool,
}

impl MessageView {
    pub fn for_viewer(message: Message, viewer: Uuid) -> Self {
        let mine = message.sender_user_id == viewer;
        Self { message, mine }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversationSummary {
    pub conversation_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub other_user: ProfileCard,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EnsureConversation {
    pub other_user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnsureResponse {
    pub conversation_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendMessage {
    #[validate(length(max = 4000))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageList {
    pub items: Vec<MessageView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationList {
    pub items: Vec<ConversationSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Number of most recent messages, 1-200 (default 200)
    pub limit: Option<u64>,
}
