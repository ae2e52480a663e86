use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_create_profiles::Profiles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserVectors::Table)
                    .if_not_exists()
                    .col(big_pk_auto(UserVectors::Id))
                    .col(uuid(UserVectors::UserId))
                    .col(string_len(UserVectors::AttributeKey, 64))
                    .col(text(UserVectors::ContentText))
                    .col(json_binary(UserVectors::Embedding))
                    .col(boolean(UserVectors::IsCore).default(false))
                    .col(
                        timestamp_with_time_zone(UserVectors::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(UserVectors::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_vectors_profile")
                            .from(UserVectors::Table, UserVectors::UserId)
                            .to(Profiles::Table, Profiles::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One entry per (user, attribute); also the upsert conflict target
        manager
            .create_index(
                Index::create()
                    .name("uq_user_vectors_user_key")
                    .table(UserVectors::Table)
                    .col(UserVectors::UserId)
                    .col(UserVectors::AttributeKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER user_vectors_touch_updated_at
                    BEFORE UPDATE ON user_vectors
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DROP TRIGGER IF EXISTS user_vectors_touch_updated_at ON user_vectors",
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UserVectors::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum UserVectors {
    Table,
    Id,
    UserId,
    AttributeKey,
    ContentText,
    Embedding,
    IsCore,
    CreatedAt,
    UpdatedAt,
}
