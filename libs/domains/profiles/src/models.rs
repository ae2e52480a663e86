use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::catalog::AttributeDef;

/// A community member's profile. Display fields are stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub user_id: Uuid,
    pub name: String,
    pub year: String,
    pub major: String,
    pub dorm: String,
    pub image_url: String,
    pub unread_notification_count: i32,
    pub notifications_read_at: Option<DateTime<Utc>>,
    pub search_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Blank profile for a principal seen for the first time.
    pub fn empty(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            name: String::new(),
            year: String::new(),
            major: String::new(),
            dorm: String::new(),
            image_url: String::new(),
            unread_notification_count: 0,
            notifications_read_at: None,
            search_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_fields(&mut self, fields: &ProfileFields) {
        if let Some(name) = &fields.name {
            self.name = name.clone();
        }
        if let Some(year) = &fields.year {
            self.year = year.clone();
        }
        if let Some(major) = &fields.major {
            self.major = major.clone();
        }
        if let Some(dorm) = &fields.dorm {
            self.dorm = dorm.clone();
        }
        if let Some(image_url) = &fields.image_url {
            self.image_url = image_url.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Profile plus the text of both core attributes, as the editor shows it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub hobbies: String,
    pub aspirations: String,
}

/// Display-field changes. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub year: Option<String>,
    pub major: Option<String>,
    pub dorm: Option<String>,
    pub image_url: Option<String>,
}

impl ProfileFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.year.is_none()
            && self.major.is_none()
            && self.dorm.is_none()
            && self.image_url.is_none()
    }
}

/// Body of `PUT /profile`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProfileUpdate {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub year: Option<String>,
    #[validate(length(max = 200))]
    pub major: Option<String>,
    #[validate(length(max = 200))]
    pub dorm: Option<String>,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
    #[validate(length(max = 2000))]
    pub hobbies: Option<String>,
    #[validate(length(max = 2000))]
    pub aspirations: Option<String>,
}

impl ProfileUpdate {
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            name: self.name.clone(),
            year: self.year.clone(),
            major: self.major.clone(),
            dorm: self.dorm.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// One stored attribute and its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VectorEntry {
    pub id: i64,
    pub user_id: Uuid,
    /// Attribute key from the catalog
    pub attribute_key: String,
    pub content_text: String,
    #[serde(skip)]
    pub embedding: Vec<f32>,
    pub is_core: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming attribute text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VectorItem {
    pub key: String,
    #[serde(default)]
    pub text: String,
}

/// Body of `POST /profile/vectors`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertVectors {
    #[validate(length(max = 32))]
    pub items: Vec<VectorItem>,
}

/// A validated write with its embedding already computed.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorWrite {
    pub attribute_key: String,
    pub content_text: String,
    pub embedding: Vec<f32>,
    pub is_core: bool,
}

/// Result of an upsert: which keys were re-embedded and which were skipped as unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpsertReport {
    pub embedded: Vec<String>,
    pub unchanged: Vec<String>,
}

/// All entries of one profile, as read by the ranking engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileVectors {
    pub user_id: Uuid,
    pub name: String,
    pub image_url: String,
    pub entries: Vec<VectorEntry>,
}

/// Short profile card for lists and previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileCard {
    pub user_id: Uuid,
    pub name: String,
    pub image_url: String,
}

impl ProfileCard {
    /// Placeholder used when the other member has no profile row yet.
    pub fn blank(user_id: Uuid) -> Self {
        Self {
            user_id,
            name: String::new(),
            image_url: String::new(),
        }
    }
}

impl From<&Profile> for ProfileCard {
    fn from(profile: &Profile) -> Self {
        Self {
            user_id: profile.user_id,
            name: profile.name.clone(),
            image_url: profile.image_url.clone(),
        }
    }
}

/// Leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileSummary {
    pub user_id: Uuid,
    pub name: String,
    pub image_url: String,
    pub search_count: i64,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            user_id: profile.user_id,
            name: profile.name.clone(),
            image_url: profile.image_url.clone(),
            search_count: profile.search_count,
        }
    }
}

/// Catalog entry as served to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttributeInfo {
    pub key: String,
    pub label: String,
    pub is_core: bool,
}

impl From<&AttributeDef> for AttributeInfo {
    fn from(def: &AttributeDef) -> Self {
        Self {
            key: def.key.to_string(),
            label: def.label.to_string(),
            is_core: def.is_core,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VectorList {
    pub items: Vec<VectorEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileSummaryList {
    pub items: Vec<ProfileSummary>,
}

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopQuery {
    /// Number of profiles to return (1-50, default 50)
    pub limit: Option<u64>,
}
