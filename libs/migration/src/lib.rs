pub use sea_orm_migration::prelude::*;

mod m20250301_000000_bootstrap;
mod m20250301_000001_create_profiles;
mod m20250301_000002_create_user_vectors;
mod m20250301_000003_create_notifications;
mod m20250301_000004_create_direct_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000000_bootstrap::Migration),
            Box::new(m20250301_000001_create_profiles::Migration),
            Box::new(m20250301_000002_create_user_vectors::Migration),
            Box::new(m20250301_000003_create_notifications::Migration),
            Box::new(m20250301_000004_create_direct_messages::Migration),
        ]
    }
}
