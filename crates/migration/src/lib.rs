//! Migrator registering entity-specific migrations in dependency order.
//! Indexes and uniqueness constraints are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user;
mod m20250101_000002_create_user_credentials;
mod m20250101_000003_create_profile;
mod m20250101_000004_create_offer;
mod m20250101_000005_create_offer_detail;
mod m20250101_000006_create_order;
mod m20250101_000007_create_review;
mod m20250101_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user::Migration),
            Box::new(m20250101_000002_create_user_credentials::Migration),
            Box::new(m20250101_000003_create_profile::Migration),
            Box::new(m20250101_000004_create_offer::Migration),
            Box::new(m20250101_000005_create_offer_detail::Migration),
            Box::new(m20250101_000006_create_order::Migration),
            Box::new(m20250101_000007_create_review::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000008_add_indexes::Migration),
        ]
    }
}
