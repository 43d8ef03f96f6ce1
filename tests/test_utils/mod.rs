//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations applied, plus builders for staged fixture rows.

#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use reconciler::models::{staged_deployment, staged_issue};
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value as JsonValue;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// UTC timestamp on 2025-01-01 at the given hour and minute.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, hour, minute, 0).unwrap()
}

/// A staged deployment with a complete dedup key and no timestamps.
pub fn deployment(
    connection_id: i64,
    scope_id: &str,
    id: &str,
    key: (&str, &str, &str),
) -> staged_deployment::Model {
    let (environment, ref_name, commit_oid) = key;
    staged_deployment::Model {
        connection_id,
        id: id.to_string(),
        scope_id: scope_id.to_string(),
        name: Some(format!("deploy {id}")),
        environment: Some(environment.to_string()),
        state: Some("SUCCESS".to_string()),
        ref_name: Some(ref_name.to_string()),
        commit_oid: Some(commit_oid.to_string()),
        created_date: Some(at(0, 0).fixed_offset()),
        updated_date: None,
        latest_updated_date: None,
    }
}

/// A staged issue created at 00:00 with the given raw fields.
pub fn staged_issue(
    connection_id: i64,
    scope_id: &str,
    issue_id: &str,
    type_id: &str,
    resolution_date: Option<DateTime<Utc>>,
    fields: JsonValue,
) -> staged_issue::Model {
    staged_issue::Model {
        connection_id,
        issue_id: issue_id.to_string(),
        scope_id: scope_id.to_string(),
        issue_key: format!("OPS-{issue_id}"),
        type_id: type_id.to_string(),
        created: at(0, 0).fixed_offset(),
        resolution_date: resolution_date.map(|t| t.fixed_offset()),
        fields,
        updated_at: at(0, 0).fixed_offset(),
    }
}
