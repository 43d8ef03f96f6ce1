//! Database migrations for the staging store.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2026_01_05_000001_create_scope_configs;
mod m2026_01_05_000002_create_issue_fields;
mod m2026_01_05_000003_create_staged_issues;
mod m2026_01_05_000004_create_issues;
mod m2026_01_05_000005_create_staged_deployments;
mod m2026_02_17_090000_add_incident_duration_fields;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2026_01_05_000001_create_scope_configs::Migration),
            Box::new(m2026_01_05_000002_create_issue_fields::Migration),
            Box::new(m2026_01_05_000003_create_staged_issues::Migration),
            Box::new(m2026_01_05_000004_create_issues::Migration),
            Box::new(m2026_01_05_000005_create_staged_deployments::Migration),
            Box::new(m2026_02_17_090000_add_incident_duration_fields::Migration),
        ]
    }
}
