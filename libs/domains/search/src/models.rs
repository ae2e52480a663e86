use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Free-text query; `limit` is clamped to 1-20 (default 10)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct SearchRequest {
    #[validate(length(max = 500))]
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// The attribute that matched best, shown to explain a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopChunk {
    /// Attribute key
    pub content: String,
    /// Stored text of that attribute
    pub content_text: String,
    pub similarity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchMatch {
    pub user_id: Uuid,
    pub name: String,
    pub image_url: String,
    pub top_chunk: TopChunk,
    pub score: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<SearchMatch>,
}
