use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the profiles table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub name: String,
    pub year: String,
    pub major: String,
    pub dorm: String,
    #[sea_orm(column_type = "Text")]
    pub image_url: String,
    pub unread_notification_count: i32,
    pub notifications_read_at: Option<DateTimeWithTimeZone>,
    pub search_count: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_vector::Entity")]
    UserVectors,
}

impl Related<super::user_vector::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserVectors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub const TAG: &'static str = "profiles";
}

impl From<Model> for crate::models::Profile {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            name: model.name,
            year: model.year,
            major: model.major,
            dorm: model.dorm,
            image_url: model.image_url,
            unread_notification_count: model.unread_notification_count,
            notifications_read_at: model.notifications_read_at.map(Into::into),
            search_count: model.search_count,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Blank row for lazy creation; counters rely on column defaults.
pub fn blank(user_id: Uuid) -> ActiveModel {
    let now = chrono::Utc::now();
    ActiveModel {
        user_id: Set(user_id),
        name: Set(String::new()),
        year: Set(String::new()),
        major: Set(String::new()),
        dorm: Set(String::new()),
        image_url: Set(String::new()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
}
