use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the notifications table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub recipient_user_id: Uuid,
    pub triggering_user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub query_text: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub const TAG: &'static str = "notifications";
}

impl From<Model> for crate::models::Notification {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            recipient_user_id: model.recipient_user_id,
            triggering_user_id: model.triggering_user_id,
            query_text: model.query_text,
            created_at: model.created_at.into(),
        }
    }
}

pub fn new_row(
    recipient_user_id: Uuid,
    triggering_user_id: Uuid,
    query_text: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> ActiveModel {
    ActiveModel {
        recipient_user_id: Set(recipient_user_id),
        triggering_user_id: Set(triggering_user_id),
        query_text: Set(query_text.to_string()),
        created_at: Set(now.into()),
        ..Default::default()
    }
}
