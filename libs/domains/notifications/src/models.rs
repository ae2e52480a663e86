use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// "You were searched for" event delivered to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: i64,
    pub recipient_user_id: Uuid,
    pub triggering_user_id: Uuid,
    pub query_text: String,
    pub created_at: DateTime<Utc>,
}

/// Bell contents: newest notifications plus the unread counter.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationList {
    pub items: Vec<Notification>,
    pub unread_count: i32,
}

/// Returned by mark-read
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadReceipt {
    pub read_at: DateTime<Utc>,
    pub unread_count: i32,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Number of notifications, 1-50 (default 5)
    pub limit: Option<u64>,
}
