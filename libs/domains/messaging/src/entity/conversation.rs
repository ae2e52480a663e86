use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the conversations table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub pair_key: String,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub const TAG: &'static str = "dms";
}

impl From<Model> for crate::models::Conversation {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            pair_key: model.pair_key,
            user_a_id: model.user_a_id,
            user_b_id: model.user_b_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<crate::models::Conversation> for ActiveModel {
    fn from(conversation: crate::models::Conversation) -> Self {
        ActiveModel {
            id: Set(conversation.id),
            pair_key: Set(conversation.pair_key),
            user_a_id: Set(conversation.user_a_id),
            user_b_id: Set(conversation.user_b_id),
            created_at: Set(conversation.created_at.into()),
        }
    }
}
