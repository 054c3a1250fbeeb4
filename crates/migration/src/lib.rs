//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250302_000001_create_clients;
mod m20250302_000002_create_services;
mod m20250302_000003_create_client_services;
mod m20250302_000004_create_payments;
mod m20250302_000005_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250302_000001_create_clients::Migration),
            Box::new(m20250302_000002_create_services::Migration),
            Box::new(m20250302_000003_create_client_services::Migration),
            Box::new(m20250302_000004_create_payments::Migration),
            // Indexes should always be applied last
            Box::new(m20250302_000005_add_indexes::Migration),
        ]
    }
}
