//! Issue extraction stage.
//!
//! Loads a scope's configuration snapshot once, then derives the effective
//! start, stop and duration of every staged issue and writes the derived
//! issue row. Staged rows are never modified.

use chrono::{DateTime, Utc};
use metrics::counter;
use sea_orm::DatabaseConnection;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::classify::{StandardType, TypeMappings, classify};
use crate::error::{InvalidScope, RepositoryError};
use crate::models::{issue, staged_issue};
use crate::repositories::{IssueFieldRepository, IssueRepository, ScopeConfigRepository};
use crate::scope::ScopeKey;
use crate::temporal::{self, FieldTypeMap, IncidentFields, ResolveInput};

/// Errors that can occur while extracting issues for a scope.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    InvalidScope(#[from] InvalidScope),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Staged issues read per round trip.
pub const STAGED_PAGE_SIZE: u64 = 500;

/// Configuration inputs materialized once per run.
#[derive(Debug, Clone, Default)]
pub struct ScopeSnapshot {
    pub incident_fields: IncidentFields,
    pub field_types: FieldTypeMap,
    pub type_mappings: Option<TypeMappings>,
}

impl ScopeSnapshot {
    /// Read scope config and field metadata. A missing config means no overrides.
    pub async fn load(db: &DatabaseConnection, scope: &ScopeKey) -> Result<Self, RepositoryError> {
        let config = ScopeConfigRepository::new(db).get(scope).await?;
        let field_types = IssueFieldRepository::new(db).field_type_map(scope).await?;

        let Some(config) = config else {
            return Ok(Self {
                field_types,
                ..Default::default()
            });
        };

        let type_mappings = match config.type_mappings() {
            Ok(mappings) => mappings,
            Err(err) => {
                warn!(
                    connection_id = scope.connection_id,
                    scope_id = %scope.scope_id,
                    error = %err,
                    "Ignoring undecodable type mappings"
                );
                None
            }
        };

        Ok(Self {
            incident_fields: config.incident_fields(),
            field_types,
            type_mappings,
        })
    }
}

/// Counts reported by one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub processed: u64,
    pub incidents: u64,
    pub with_duration: u64,
}

/// Build the derived issue for one staged issue.
pub fn derive_issue(
    staged: &staged_issue::Model,
    snapshot: &ScopeSnapshot,
    now: DateTime<Utc>,
) -> issue::Model {
    let type_mappings = snapshot.type_mappings.as_ref();
    let input = ResolveInput {
        created: staged.created.with_timezone(&Utc),
        default_stop: staged.resolution_date.map(|d| d.with_timezone(&Utc)),
        fields: &staged.fields,
        incident_fields: &snapshot.incident_fields,
        field_types: &snapshot.field_types,
        type_id: &staged.type_id,
        type_mappings,
    };
    let derived = temporal::derive(&input);

    issue::Model {
        connection_id: staged.connection_id,
        issue_id: staged.issue_id.clone(),
        scope_id: staged.scope_id.clone(),
        issue_key: staged.issue_key.clone(),
        std_type: classify(&staged.type_id, type_mappings).map(|t| t.as_str().to_string()),
        effective_start: derived.effective_start.fixed_offset(),
        effective_stop: derived.effective_stop.map(|t| t.fixed_offset()),
        duration_minutes: derived.duration_minutes,
        updated_at: now.fixed_offset(),
    }
}

/// Derive and write every staged issue of the scope.
#[instrument(
    skip(db, scope),
    fields(connection_id = scope.connection_id, scope_id = %scope.scope_id)
)]
pub async fn extract_issues(
    db: &DatabaseConnection,
    scope: &ScopeKey,
) -> Result<ExtractionSummary, ExtractionError> {
    scope.validate()?;

    let snapshot = ScopeSnapshot::load(db, scope).await?;
    debug!(
        timestamp_fields = snapshot.field_types.len(),
        has_type_mappings = snapshot.type_mappings.is_some(),
        "Loaded scope snapshot"
    );

    let repo = IssueRepository::new(db);
    let now = Utc::now();
    let incident = Some(StandardType::Incident.as_str());

    let mut summary = ExtractionSummary::default();
    let mut cursor: Option<String> = None;
    loop {
        let page = repo
            .staged_page(scope, cursor.as_deref(), STAGED_PAGE_SIZE)
            .await?;
        let Some(last) = page.last() else {
            break;
        };
        cursor = Some(last.issue_id.clone());

        for row in &page {
            let derived = derive_issue(row, &snapshot, now);
            summary.processed += 1;
            if derived.std_type.as_deref() == incident {
                summary.incidents += 1;
            }
            if derived.duration_minutes.is_some() {
                summary.with_duration += 1;
            }
            repo.upsert_derived(derived).await?;
        }

        if (page.len() as u64) < STAGED_PAGE_SIZE {
            break;
        }
    }

    counter!("reconciler_issues_extracted_total").increment(summary.processed);
    counter!("reconciler_incident_overrides_total").increment(summary.incidents);
    info!(
        processed = summary.processed,
        incidents = summary.incidents,
        with_duration = summary.with_duration,
        "Extracted issues"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::HashMap;

    fn staged(type_id: &str) -> staged_issue::Model {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        staged_issue::Model {
            connection_id: 1,
            issue_id: "100".to_string(),
            scope_id: "board-1".to_string(),
            issue_key: "OPS-1".to_string(),
            type_id: type_id.to_string(),
            created: created.fixed_offset(),
            resolution_date: Some((created + chrono::Duration::hours(3)).fixed_offset()),
            fields: json!({
                "customfield_start": "2025-01-01T01:00:00Z",
                "customfield_stop": "2025-01-01T02:30:00Z",
            }),
            updated_at: created.fixed_offset(),
        }
    }

    fn snapshot() -> ScopeSnapshot {
        ScopeSnapshot {
            incident_fields: IncidentFields::new(
                Some("customfield_start".to_string()),
                Some("customfield_stop".to_string()),
            ),
            field_types: [("customfield_start", "date"), ("customfield_stop", "datetime")]
                .into_iter()
                .collect(),
            type_mappings: Some(TypeMappings {
                type_id_mappings: HashMap::from([
                    ("10001".to_string(), "Incident".to_string()),
                    ("10002".to_string(), "Bug".to_string()),
                ]),
                std_type_mappings: HashMap::from([
                    ("Incident".to_string(), "INCIDENT".to_string()),
                    ("Bug".to_string(), "BUG".to_string()),
                ]),
            }),
        }
    }

    #[test]
    fn incident_issue_uses_custom_window() {
        let derived = derive_issue(&staged("10001"), &snapshot(), Utc::now());
        assert_eq!(derived.std_type.as_deref(), Some("INCIDENT"));
        assert_eq!(
            derived.effective_start,
            Utc.with_ymd_and_hms(2025, 1, 1, 1, 0, 0).unwrap().fixed_offset()
        );
        assert_eq!(derived.duration_minutes, Some(90));
    }

    #[test]
    fn bug_issue_keeps_created_and_resolution() {
        let derived = derive_issue(&staged("10002"), &snapshot(), Utc::now());
        assert_eq!(derived.std_type.as_deref(), Some("BUG"));
        assert_eq!(derived.effective_start, staged("10002").created);
        assert_eq!(derived.duration_minutes, Some(180));
    }

    #[test]
    fn unconfigured_scope_uses_defaults() {
        let derived = derive_issue(&staged("10001"), &ScopeSnapshot::default(), Utc::now());
        assert_eq!(derived.std_type, None);
        assert_eq!(derived.effective_stop, staged("10001").resolution_date);
        assert_eq!(derived.duration_minutes, Some(180));
    }
}
