use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::MAX_ATTRIBUTES_PER_USER;
use crate::error::{ProfileError, ProfileResult};
use crate::models::{
    Profile, ProfileCard, ProfileFields, ProfileSummary, ProfileVectors, VectorEntry, VectorWrite,
};

/// Repository trait for profiles and their attribute vectors
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch a profile, inserting a blank one if the user has none yet
    async fn get_or_create(&self, user_id: Uuid) -> ProfileResult<Profile>;

    /// Fetch a profile without creating it
    async fn get(&self, user_id: Uuid) -> ProfileResult<Option<Profile>>;

    /// Entries of one user, in insertion order
    async fn list_vectors(&self, user_id: Uuid) -> ProfileResult<Vec<VectorEntry>>;

    /// Apply display fields and pre-embedded vector writes atomically.
    ///
    /// Re-checks the attribute cap against the stored keys and skips writes
    /// whose text is already stored. Nothing is persisted on error.
    async fn save(
        &self,
        user_id: Uuid,
        fields: ProfileFields,
        writes: Vec<VectorWrite>,
    ) -> ProfileResult<Profile>;

    /// Delete one entry; returns whether a row existed
    async fn delete_vector(&self, user_id: Uuid, attribute_key: &str) -> ProfileResult<bool>;

    /// Every profile that has at least one entry, with its entries
    async fn corpus(&self) -> ProfileResult<Vec<ProfileVectors>>;

    /// Profiles ordered by search_count desc, then user_id
    async fn top(&self, limit: u64) -> ProfileResult<Vec<ProfileSummary>>;

    /// Cards for the given users; unknown ids are omitted
    async fn cards(&self, user_ids: Vec<Uuid>) -> ProfileResult<Vec<ProfileCard>>;
}

/// Union of stored and incoming keys, failing when it passes the cap.
pub(crate) fn check_capacity<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    incoming: impl IntoIterator<Item = &'a str>,
) -> ProfileResult<()> {
    let keys: HashSet<&str> = existing.into_iter().chain(incoming).collect();
    if keys.len() > MAX_ATTRIBUTES_PER_USER {
        return Err(ProfileError::CapacityExceeded {
            limit: MAX_ATTRIBUTES_PER_USER,
            requested: keys.len(),
        });
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Store {
    profiles: HashMap<Uuid, Profile>,
    vectors: HashMap<Uuid, Vec<VectorEntry>>,
    next_vector_id: i64,
}

/// In-memory implementation of ProfileRepository (for development/testing)
///
/// One write lock covers a whole `save`, which makes capacity check and
/// write atomic per call.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProfileRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump a profile's search counter, as a notification fan-out would.
    pub async fn record_search_hit(&self, user_id: Uuid) {
        let mut store = self.store.write().await;
        if let Some(profile) = store.profiles.get_mut(&user_id) {
            profile.search_count += 1;
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get_or_create(&self, user_id: Uuid) -> ProfileResult<Profile> {
        let mut store = self.store.write().await;
        let profile = store.profiles.entry(user_id).or_insert_with(|| {
            tracing::info!(user_id = %user_id, "Created profile");
            Profile::empty(user_id)
        });
        Ok(profile.clone())
    }

    async fn get(&self, user_id: Uuid) -> ProfileResult<Option<Profile>> {
        let store = self.store.read().await;
        Ok(store.profiles.get(&user_id).cloned())
    }

    async fn list_vectors(&self, user_id: Uuid) -> ProfileResult<Vec<VectorEntry>> {
        let store = self.store.read().await;
        Ok(store.vectors.get(&user_id).cloned().unwrap_or_default())
    }

    async fn save(
        &self,
        user_id: Uuid,
        fields: ProfileFields,
        writes: Vec<VectorWrite>,
    ) -> ProfileResult<Profile> {
        let mut store = self.store.write().await;
        let Store {
            profiles,
            vectors,
            next_vector_id,
        } = &mut *store;

        let entries = vectors.entry(user_id).or_default();
        check_capacity(
            entries.iter().map(|e| e.attribute_key.as_str()),
            writes.iter().map(|w| w.attribute_key.as_str()),
        )?;

        let profile = profiles
            .entry(user_id)
            .or_insert_with(|| Profile::empty(user_id));
        if !fields.is_empty() {
            profile.apply_fields(&fields);
        }

        let now = Utc::now();
        for write in writes {
            match entries
                .iter_mut()
                .find(|e| e.attribute_key == write.attribute_key)
            {
                Some(entry) if entry.content_text == write.content_text => {}
                Some(entry) => {
                    entry.content_text = write.content_text;
                    entry.embedding = write.embedding;
                    entry.is_core = write.is_core;
                    entry.updated_at = now;
                }
                None => {
                    *next_vector_id += 1;
                    entries.push(VectorEntry {
                        id: *next_vector_id,
                        user_id,
                        attribute_key: write.attribute_key,
                        content_text: write.content_text,
                        embedding: write.embedding,
                        is_core: write.is_core,
                        created_at: now,
                        updated_at: now,
                    });
                }
            }
        }

        Ok(profile.clone())
    }

    async fn delete_vector(&self, user_id: Uuid, attribute_key: &str) -> ProfileResult<bool> {
        let mut store = self.store.write().await;
        let Some(entries) = store.vectors.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|e| e.attribute_key != attribute_key);
        Ok(entries.len() != before)
    }

    async fn corpus(&self) -> ProfileResult<Vec<ProfileVectors>> {
        let store = self.store.read().await;
        Ok(store
            .vectors
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(user_id, entries)| {
                let profile = store.profiles.get(user_id);
                ProfileVectors {
                    user_id: *user_id,
                    name: profile.map(|p| p.name.clone()).unwrap_or_default(),
                    image_url: profile.map(|p| p.image_url.clone()).unwrap_or_default(),
                    entries: entries.clone(),
                }
            })
            .collect())
    }

    async fn top(&self, limit: u64) -> ProfileResult<Vec<ProfileSummary>> {
        let store = self.store.read().await;
        let mut rows: Vec<ProfileSummary> =
            store.profiles.values().map(ProfileSummary::from).collect();
        rows.sort_by(|a, b| {
            b.search_count
                .cmp(&a.search_count)
                .then(a.user_id.cmp(&b.user_id))
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn cards(&self, user_ids: Vec<Uuid>) -> ProfileResult<Vec<ProfileCard>> {
        let store = self.store.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| store.profiles.get(id).map(ProfileCard::from))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(key: &str, text: &str) -> VectorWrite {
        VectorWrite {
            attribute_key: key.to_string(),
            content_text: text.to_string(),
            embedding: vec![1.0, 0.0],
            is_core: key == "hobbies",
        }
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let repo = InMemoryProfileRepository::new();
        let user_id = Uuid::now_v7();

        let first = repo.get_or_create(user_id).await.unwrap();
        let second = repo.get_or_create(user_id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.unread_notification_count, 0);
        assert!(first.notifications_read_at.is_none());
    }

    #[tokio::test]
    async fn test_save_inserts_then_updates_in_place() {
        let repo = InMemoryProfileRepository::new();
        let user_id = Uuid::now_v7();

        repo.save(user_id, ProfileFields::default(), vec![write("hobbies", "chess")])
            .await
            .unwrap();
        repo.save(user_id, ProfileFields::default(), vec![write("clubs", "robotics")])
            .await
            .unwrap();
        repo.save(user_id, ProfileFields::default(), vec![write("hobbies", "go")])
            .await
            .unwrap();

        let entries = repo.list_vectors(user_id).await.unwrap();
        let keys: Vec<_> = entries.iter().map(|e| e.attribute_key.as_str()).collect();
        assert_eq!(keys, vec!["hobbies", "clubs"]);
        assert_eq!(entries[0].content_text, "go");
        assert!(entries[0].id < entries[1].id);
    }

    #[tokio::test]
    async fn test_save_rejects_over_capacity_without_writing() {
        let repo = InMemoryProfileRepository::new();
        let user_id = Uuid::now_v7();

        let batch: Vec<_> = (0..15).map(|i| write(&format!("k{i}"), "text")).collect();
        repo.save(user_id, ProfileFields::default(), batch).await.unwrap();

        let fields = ProfileFields {
            name: Some("Ada".into()),
            ..Default::default()
        };
        let err = repo
            .save(user_id, fields, vec![write("k0", "changed"), write("k15", "text")])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProfileError::CapacityExceeded {
                limit: 15,
                requested: 16
            }
        ));
        let entries = repo.list_vectors(user_id).await.unwrap();
        assert_eq!(entries.len(), 15);
        assert_eq!(entries[0].content_text, "text");
        assert_eq!(repo.get(user_id).await.unwrap().unwrap().name, "");
    }

    #[tokio::test]
    async fn test_delete_vector_reports_presence() {
        let repo = InMemoryProfileRepository::new();
        let user_id = Uuid::now_v7();
        repo.save(user_id, ProfileFields::default(), vec![write("clubs", "chess club")])
            .await
            .unwrap();

        assert!(repo.delete_vector(user_id, "clubs").await.unwrap());
        assert!(!repo.delete_vector(user_id, "clubs").await.unwrap());
        assert!(!repo.delete_vector(Uuid::now_v7(), "clubs").await.unwrap());
    }

    #[tokio::test]
    async fn test_corpus_skips_profiles_without_entries() {
        let repo = InMemoryProfileRepository::new();
        let with_entries = Uuid::now_v7();
        let without = Uuid::now_v7();

        repo.get_or_create(without).await.unwrap();
        repo.save(
            with_entries,
            ProfileFields {
                name: Some("Grace".into()),
                ..Default::default()
            },
            vec![write("hobbies", "compilers")],
        )
        .await
        .unwrap();

        let corpus = repo.corpus().await.unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].user_id, with_entries);
        assert_eq!(corpus[0].name, "Grace");
    }

    #[tokio::test]
    async fn test_top_orders_by_search_count_then_id() {
        let repo = InMemoryProfileRepository::new();
        let mut ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            repo.get_or_create(*id).await.unwrap();
        }
        repo.record_search_hit(ids[2]).await;

        let top = repo.top(10).await.unwrap();
        assert_eq!(top[0].user_id, ids[2]);
        assert_eq!(top[0].search_count, 1);

        let rest: Vec<Uuid> = top[1..].iter().map(|r| r.user_id).collect();
        ids.truncate(2);
        ids.sort();
        assert_eq!(rest, ids);

        assert_eq!(repo.top(1).await.unwrap().len(), 1);
    }
}
