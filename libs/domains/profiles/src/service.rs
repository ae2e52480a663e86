use async_trait::async_trait;
use domain_embeddings::EmbeddingProvider;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::catalog::{self, ASPIRATIONS, CATALOG, HOBBIES};
use crate::error::{ProfileError, ProfileResult};
use crate::models::{
    AttributeInfo, Profile, ProfileCard, ProfileFields, ProfileSummary, ProfileUpdate,
    ProfileVectors, ProfileView, UpsertReport, VectorEntry, VectorItem, VectorWrite,
};
use crate::repository::{ProfileRepository, check_capacity};

pub const DEFAULT_TOP_LIMIT: u64 = 50;
pub const MAX_TOP_LIMIT: u64 = 50;

/// Read access other domains need: the ranking corpus and profile cards.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    async fn corpus(&self) -> ProfileResult<Vec<ProfileVectors>>;

    async fn cards(&self, user_ids: Vec<Uuid>) -> ProfileResult<Vec<ProfileCard>>;
}

/// Profiles and the per-user vector store.
pub struct ProfileService<R: ProfileRepository> {
    repository: Arc<R>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl<R: ProfileRepository> Clone for ProfileService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            embedder: Arc::clone(&self.embedder),
        }
    }
}

/// An item that passed validation, before embedding.
#[derive(Debug)]
struct PendingItem {
    key: String,
    text: String,
    is_core: bool,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repository: R, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            repository: Arc::new(repository),
            embedder,
        }
    }

    /// Profile of the caller, created blank on first access.
    pub async fn get_or_create(&self, user_id: Uuid) -> ProfileResult<Profile> {
        self.repository.get_or_create(user_id).await
    }

    /// Profile plus the text of both core attributes.
    pub async fn get_view(&self, user_id: Uuid) -> ProfileResult<ProfileView> {
        let profile = self.get_or_create(user_id).await?;
        let entries = self.repository.list_vectors(user_id).await?;
        Ok(Self::view(profile, &entries))
    }

    /// Save display fields and core attributes in one step.
    ///
    /// Changed core texts are embedded first; the fields and the vectors then
    /// commit together, so a failed embedding leaves everything untouched.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> ProfileResult<ProfileView> {
        update
            .validate()
            .map_err(|e| ProfileError::Validation(e.to_string()))?;

        let mut items = Vec::new();
        if let Some(text) = &update.hobbies {
            items.push(VectorItem {
                key: HOBBIES.to_string(),
                text: text.clone(),
            });
        }
        if let Some(text) = &update.aspirations {
            items.push(VectorItem {
                key: ASPIRATIONS.to_string(),
                text: text.clone(),
            });
        }

        let (writes, _) = self.prepare(user_id, items).await?;
        let profile = self
            .repository
            .save(user_id, update.fields(), writes)
            .await?;

        let entries = self.repository.list_vectors(user_id).await?;
        Ok(Self::view(profile, &entries))
    }

    /// Insert or update attributes, re-embedding only changed text.
    ///
    /// Items with empty text are ignored. Fails with `CapacityExceeded`
    /// before any embedding call when the user would pass the cap, and
    /// with `EmbeddingUnavailable` (persisting nothing) when any embedding
    /// fails.
    pub async fn upsert_many(
        &self,
        user_id: Uuid,
        items: Vec<VectorItem>,
    ) -> ProfileResult<UpsertReport> {
        let (writes, unchanged) = self.prepare(user_id, items).await?;
        let embedded = writes.iter().map(|w| w.attribute_key.clone()).collect();

        if !writes.is_empty() {
            self.repository
                .save(user_id, ProfileFields::default(), writes)
                .await?;
        }

        Ok(UpsertReport {
            embedded,
            unchanged,
        })
    }

    /// Remove an extension attribute. Missing keys are a no-op.
    pub async fn remove(&self, user_id: Uuid, key: &str) -> ProfileResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ProfileError::Validation(
                "Attribute key is required".to_string(),
            ));
        }
        if catalog::is_core(key) {
            return Err(ProfileError::CoreKeyProtected(key.to_string()));
        }

        let deleted = self.repository.delete_vector(user_id, key).await?;
        tracing::info!(user_id = %user_id, key, deleted, "Removed attribute");
        Ok(())
    }

    /// Entries of one user, in insertion order.
    pub async fn list_by_user(&self, user_id: Uuid) -> ProfileResult<Vec<VectorEntry>> {
        self.repository.list_vectors(user_id).await
    }

    /// Most-searched profiles.
    pub async fn top(&self, limit: Option<u64>) -> ProfileResult<Vec<ProfileSummary>> {
        let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT);
        self.repository.top(limit).await
    }

    pub fn catalog(&self) -> Vec<AttributeInfo> {
        CATALOG.iter().map(AttributeInfo::from).collect()
    }

    fn view(profile: Profile, entries: &[VectorEntry]) -> ProfileView {
        let text_of = |key: &str| {
            entries
                .iter()
                .find(|e| e.attribute_key == key)
                .map(|e| e.content_text.clone())
                .unwrap_or_default()
        };

        ProfileView {
            hobbies: text_of(HOBBIES),
            aspirations: text_of(ASPIRATIONS),
            profile,
        }
    }

    /// Validate, check capacity and embed changed items.
    ///
    /// Returns the writes to persist and the keys skipped as unchanged.
    async fn prepare(
        &self,
        user_id: Uuid,
        items: Vec<VectorItem>,
    ) -> ProfileResult<(Vec<VectorWrite>, Vec<String>)> {
        let pending = Self::normalize(items)?;
        if pending.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let existing: HashMap<String, String> = self
            .repository
            .list_vectors(user_id)
            .await?
            .into_iter()
            .map(|e| (e.attribute_key, e.content_text))
            .collect();

        check_capacity(
            existing.keys().map(String::as_str),
            pending.iter().map(|p| p.key.as_str()),
        )?;

        let (unchanged, changed): (Vec<PendingItem>, Vec<PendingItem>) = pending
            .into_iter()
            .partition(|p| existing.get(&p.key) == Some(&p.text));

        for item in &unchanged {
            tracing::debug!(user_id = %user_id, key = %item.key, "Attribute unchanged, skipping embed");
        }

        let embeddings = try_join_all(changed.iter().map(|p| self.embedder.embed(&p.text)))
            .await
            .inspect_err(|e| {
                tracing::warn!(user_id = %user_id, error = %e, "Embedding failed, nothing saved");
            })?;

        let writes = changed
            .into_iter()
            .zip(embeddings)
            .map(|(p, embedding)| VectorWrite {
                attribute_key: p.key,
                content_text: p.text,
                embedding,
                is_core: p.is_core,
            })
            .collect();

        Ok((writes, unchanged.into_iter().map(|p| p.key).collect()))
    }

    /// Trim keys, validate them against the catalog, drop empty text and
    /// keep the last item per key.
    fn normalize(items: Vec<VectorItem>) -> ProfileResult<Vec<PendingItem>> {
        let mut pending: Vec<PendingItem> = Vec::with_capacity(items.len());

        for item in items {
            let key = item.key.trim();
            if key.is_empty() {
                return Err(ProfileError::Validation(
                    "Attribute key is required".to_string(),
                ));
            }
            let def = catalog::lookup(key)
                .ok_or_else(|| ProfileError::Validation(format!("Unknown attribute '{}'", key)))?;

            let duplicate = pending.iter().position(|p| p.key == def.key);
            if item.text.trim().is_empty() {
                // Empty text leaves the stored value alone, even over an earlier item
                if let Some(index) = duplicate {
                    pending.remove(index);
                }
                continue;
            }

            let next = PendingItem {
                key: def.key.to_string(),
                text: item.text,
                is_core: def.is_core,
            };
            match duplicate {
                Some(index) => pending[index] = next,
                None => pending.push(next),
            }
        }

        Ok(pending)
    }
}

#[async_trait]
impl<R: ProfileRepository + 'static> ProfileDirectory for ProfileService<R> {
    async fn corpus(&self) -> ProfileResult<Vec<ProfileVectors>> {
        self.repository.corpus().await
    }

    async fn cards(&self, user_ids: Vec<Uuid>) -> ProfileResult<Vec<ProfileCard>> {
        self.repository.cards(user_ids).await
    }
}
