use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::UserId).uuid().not_null().primary_key())
                    .col(string(Profiles::Name).default(""))
                    .col(string(Profiles::Year).default(""))
                    .col(string(Profiles::Major).default(""))
                    .col(string(Profiles::Dorm).default(""))
                    .col(text(Profiles::ImageUrl).default(""))
                    .col(
                        integer(Profiles::UnreadNotificationCount)
                            .default(0)
                            .check(Expr::col(Profiles::UnreadNotificationCount).gte(0)),
                    )
                    .col(timestamp_with_time_zone_null(Profiles::NotificationsReadAt))
                    .col(big_integer(Profiles::SearchCount).default(0))
                    .col(
                        timestamp_with_time_zone(Profiles::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Profiles::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Leaderboard order
        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_search_count")
                    .table(Profiles::Table)
                    .col((Profiles::SearchCount, IndexOrder::Desc))
                    .col(Profiles::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER profiles_touch_updated_at
                    BEFORE UPDATE ON profiles
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
            .execute_unprepared("DROP TRIGGER IF EXISTS profiles_touch_updated_at ON profiles")
            .await?;

        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Profiles {
    Table,
    UserId,
    Name,
    Year,
    Major,
    Dorm,
    ImageUrl,
    UnreadNotificationCount,
    NotificationsReadAt,
    SearchCount,
    CreatedAt,
    UpdatedAt,
}
