//! Database migrations for the Academic ERP service.
//!
//! Applied at startup by the server binary and by the test harness against
//! an in-memory SQLite database.

pub use sea_orm_migration::prelude::*;

mod m2025_01_10_090000_create_organisations;
mod m2025_01_10_090100_create_organisation_hr;
mod m2025_01_12_110000_create_oauth_states;
mod m2025_01_12_110100_create_sessions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_10_090000_create_organisations::Migration),
            Box::new(m2025_01_10_090100_create_organisation_hr::Migration),
            Box::new(m2025_01_12_110000_create_oauth_states::Migration),
            Box::new(m2025_01_12_110100_create_sessions::Migration),
        ]
    }
}
