use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the messages table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::conversation::Entity",
        from = "Column::ConversationId",
        to = "super::conversation::Column::Id",
        on_delete = "Cascade"
    )]
    Conversation,
}

impl Related<super::conversation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Conversation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Message {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            conversation_id: model.conversation_id,
            sender_user_id: model.sender_user_id,
            body: model.body,
            created_at: model.created_at.into(),
        }
    }
}

impl From<crate::models::Message> for ActiveModel {
    fn from(message: crate::models::Message) -> Self {
        ActiveModel {
            id: Set(message.id),
            conversation_id: Set(message.conversation_id),
            sender_user_id: Set(message.sender_user_id),
            body: Set(message.body),
            created_at: Set(message.created_at.into()),
        }
    }
}
