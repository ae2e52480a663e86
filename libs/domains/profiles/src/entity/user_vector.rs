use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};
use crate::models::{VectorEntry, VectorWrite};

/// Sea-ORM Entity for the user_vectors table
///
/// Embeddings are stored as a JSONB float array.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_vectors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Uuid,
    pub attribute_key: String,
    #[sea_orm(column_type = "Text")]
    pub content_text: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub embedding: Json,
    pub is_core: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::UserId",
        to = "super::profile::Column::UserId",
        on_delete = "Cascade"
    )]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for VectorEntry {
    type Error = ProfileError;

    fn try_from(model: Model) -> ProfileResult<Self> {
        let embedding: Vec<f32> = serde_json::from_value(model.embedding).map_err(|e| {
            ProfileError::Internal(format!(
                "Corrupt embedding for vector {}: {}",
                model.id, e
            ))
        })?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            attribute_key: model.attribute_key,
            content_text: model.content_text,
            embedding,
            is_core: model.is_core,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Insert model for an upsert; `id` is left to the sequence.
pub fn from_write(user_id: Uuid, write: &VectorWrite) -> ProfileResult<ActiveModel> {
    let embedding = serde_json::to_value(&write.embedding)
        .map_err(|e| ProfileError::Internal(format!("Failed to encode embedding: {}", e)))?;
    let now = chrono::Utc::now();

    Ok(ActiveModel {
        user_id: Set(user_id),
        attribute_key: Set(write.attribute_key.clone()),
        content_text: Set(write.content_text.clone()),
        embedding: Set(embedding),
        is_core: Set(write.is_core),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    })
}
