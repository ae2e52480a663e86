use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entity::{profile, user_vector};
use crate::error::{ProfileError, ProfileResult};
use crate::models::{
    Profile, ProfileCard, ProfileFields, ProfileSummary, ProfileVectors, VectorEntry, VectorWrite,
};
use crate::repository::{ProfileRepository, check_capacity};

pub struct PgProfileRepository {
    db: DatabaseConnection,
}

impl PgProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a blank row unless one exists, then lock it for the rest of `txn`.
    async fn lock_profile(
        txn: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ProfileResult<profile::Model> {
        profile::Entity::insert(profile::blank(user_id))
            .on_conflict(
                OnConflict::column(profile::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await?;

        profile::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(ProfileError::NotFound(user_id))
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn get_or_create(&self, user_id: Uuid) -> ProfileResult<Profile> {
        let inserted = profile::Entity::insert(profile::blank(user_id))
            .on_conflict(
                OnConflict::column(profile::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        if inserted > 0 {
            tracing::info!(user_id = %user_id, "Created profile");
        }

        profile::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .map(Into::into)
            .ok_or(ProfileError::NotFound(user_id))
    }

    async fn get(&self, user_id: Uuid) -> ProfileResult<Option<Profile>> {
        let model = profile::Entity::find_by_id(user_id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list_vectors(&self, user_id: Uuid) -> ProfileResult<Vec<VectorEntry>> {
        user_vector::Entity::find()
            .filter(user_vector::Column::UserId.eq(user_id))
            .order_by_asc(user_vector::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(VectorEntry::try_from)
            .collect()
    }

    async fn save(
        &self,
        user_id: Uuid,
        fields: ProfileFields,
        writes: Vec<VectorWrite>,
    ) -> ProfileResult<Profile> {
        let txn = self.db.begin().await?;

        // Serialises concurrent saves of the same user
        let locked = Self::lock_profile(&txn, user_id).await?;

        let existing: HashMap<String, String> = user_vector::Entity::find()
            .select_only()
            .column(user_vector::Column::AttributeKey)
            .column(user_vector::Column::ContentText)
            .filter(user_vector::Column::UserId.eq(user_id))
            .into_tuple::<(String, String)>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        check_capacity(
            existing.keys().map(String::as_str),
            writes.iter().map(|w| w.attribute_key.as_str()),
        )?;

        let mut written = 0usize;
        for write in &writes {
            if existing.get(&write.attribute_key) == Some(&write.content_text) {
                continue;
            }

            user_vector::Entity::insert(user_vector::from_write(user_id, write)?)
                .on_conflict(
                    OnConflict::columns([
                        user_vector::Column::UserId,
                        user_vector::Column::AttributeKey,
                    ])
                    .update_columns([
                        user_vector::Column::ContentText,
                        user_vector::Column::Embedding,
                        user_vector::Column::IsCore,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
            written += 1;
        }

        let saved = if fields.is_empty() {
            locked
        } else {
            let mut active = locked.into_active_model();
            if let Some(name) = fields.name {
                active.name = Set(name);
            }
            if let Some(year) = fields.year {
                active.year = Set(year);
            }
            if let Some(major) = fields.major {
                active.major = Set(major);
            }
            if let Some(dorm) = fields.dorm {
                active.dorm = Set(dorm);
            }
            if let Some(image_url) = fields.image_url {
                active.image_url = Set(image_url);
            }
            active.updated_at = Set(chrono::Utc::now().into());
            profile::Entity::update(active).exec(&txn).await?
        };

        txn.commit().await?;

        tracing::info!(user_id = %user_id, vectors_written = written, "Saved profile");
        Ok(saved.into())
    }

    async fn delete_vector(&self, user_id: Uuid, attribute_key: &str) -> ProfileResult<bool> {
        let result = user_vector::Entity::delete_many()
            .filter(user_vector::Column::UserId.eq(user_id))
            .filter(user_vector::Column::AttributeKey.eq(attribute_key))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn corpus(&self) -> ProfileResult<Vec<ProfileVectors>> {
        let rows = user_vector::Entity::find()
            .order_by_asc(user_vector::Column::UserId)
            .order_by_asc(user_vector::Column::Id)
            .all(&self.db)
            .await?;

        let mut grouped: Vec<ProfileVectors> = Vec::new();
        for row in rows {
            let entry = VectorEntry::try_from(row)?;
            match grouped.last_mut() {
                Some(last) if last.user_id == entry.user_id => last.entries.push(entry),
                _ => grouped.push(ProfileVectors {
                    user_id: entry.user_id,
                    name: String::new(),
                    image_url: String::new(),
                    entries: vec![entry],
                }),
            }
        }

        let ids: Vec<Uuid> = grouped.iter().map(|p| p.user_id).collect();
        let cards: HashMap<Uuid, ProfileCard> = self
            .cards(ids)
            .await?
            .into_iter()
            .map(|c| (c.user_id, c))
            .collect();

        for profile in &mut grouped {
            if let Some(card) = cards.get(&profile.user_id) {
                profile.name = card.name.clone();
                profile.image_url = card.image_url.clone();
            }
        }

        Ok(grouped)
    }

    async fn top(&self, limit: u64) -> ProfileResult<Vec<ProfileSummary>> {
        let models = profile::Entity::find()
            .order_by_desc(profile::Column::SearchCount)
            .order_by_asc(profile::Column::UserId)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| ProfileSummary::from(&Profile::from(m)))
            .collect())
    }

    async fn cards(&self, user_ids: Vec<Uuid>) -> ProfileResult<Vec<ProfileCard>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = profile::Entity::find()
            .filter(profile::Column::UserId.is_in(user_ids))
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| ProfileCard::from(&Profile::from(m)))
            .collect())
    }
}
