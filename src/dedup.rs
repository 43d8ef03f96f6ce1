//! Composite-key deduplication of staged records.
//!
//! Paginated, overlapping pulls can write the same logical entity several
//! times under different identities. For one scope, rows sharing a dedup key
//! are ranked by recency (`COALESCE` over the recency columns, descending,
//! rows without any recency last) with the identity column descending as
//! tie-break, and every row but the
//! first is deleted in a single statement. Rows whose required key columns
//! are null or empty are never ranked and therefore never deleted.

use metrics::counter;
use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, Statement, Value};
use thiserror::Error;
use tracing::{info, instrument};

use crate::error::InvalidScope;
use crate::scope::ScopeKey;

/// Errors that can occur while deduplicating a scope.
#[derive(Debug, Error)]
pub enum DedupError {
    #[error(transparent)]
    InvalidScope(#[from] InvalidScope),
    /// Storage failures are passed through unchanged.
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Describes how one staged table is deduplicated.
///
/// All names are trusted static identifiers; only scope values are bound.
#[derive(Debug, Clone, Copy)]
pub struct DedupPlan {
    pub table: &'static str,
    /// Column holding the connection id
    pub connection_column: &'static str,
    /// Column holding the remote scope id
    pub scope_column: &'static str,
    /// Columns identifying a single row
    pub identity_columns: &'static [&'static str],
    /// Business key columns, partitioned on together with the scope columns
    pub key_columns: &'static [&'static str],
    /// Key columns that must be non-null and non-empty for a row to be considered
    pub required_columns: &'static [&'static str],
    /// Recency columns, first non-null wins
    pub recency_columns: &'static [&'static str],
    pub tie_break_column: &'static str,
}

/// Staged CI/CD deployments, keyed by environment, ref and commit.
pub const DEPLOYMENT_DEDUP_PLAN: DedupPlan = DedupPlan {
    table: "staged_deployments",
    connection_column: "connection_id",
    scope_column: "scope_id",
    identity_columns: &["connection_id", "id"],
    key_columns: &["environment", "ref_name", "commit_oid"],
    required_columns: &["ref_name", "commit_oid"],
    recency_columns: &["latest_updated_date", "updated_date"],
    tie_break_column: "id",
};

impl DedupPlan {
    /// Render the ranked delete for the given backend.
    ///
    /// The connection id is bound first and the scope id second.
    pub fn delete_sql(&self, backend: DatabaseBackend) -> String {
        let (p1, p2) = match backend {
            DatabaseBackend::Postgres => ("$1", "$2"),
            _ => ("?", "?"),
        };

        let identity = self.identity_columns.join(", ");
        let partition = [self.connection_column, self.scope_column]
            .iter()
            .chain(self.key_columns)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        let recency = match self.recency_columns {
            [single] => single.to_string(),
            many => format!("COALESCE({})", many.join(", ")),
        };
        let required = self
            .required_columns
            .iter()
            .map(|c| format!("\n\t\t  AND {c} IS NOT NULL AND {c} <> ''"))
            .collect::<String>();

        format!(
            "DELETE FROM {table}
WHERE ({identity}) IN (
\tSELECT {identity}
\tFROM (
\t\tSELECT
\t\t\t{identity},
\t\t\tROW_NUMBER() OVER (
\t\t\t\tPARTITION BY {partition}
\t\t\t\tORDER BY {recency} DESC NULLS LAST, {tie} DESC
\t\t\t) AS rn
\t\tFROM {table}
\t\tWHERE {conn} = {p1}
\t\t  AND {scope} = {p2}{required}
\t) ranked
\tWHERE rn > 1
)",
            table = self.table,
            tie = self.tie_break_column,
            conn = self.connection_column,
            scope = self.scope_column,
        )
    }

    fn delete_statement(&self, backend: DatabaseBackend, scope: &ScopeKey) -> Statement {
        Statement::from_sql_and_values(
            backend,
            self.delete_sql(backend),
            [
                Value::BigInt(Some(scope.connection_id)),
                Value::String(Some(Box::new(scope.scope_id.clone()))),
            ],
        )
    }
}

/// Delete every duplicate in one scope according to `plan`; returns the number of rows removed.
#[instrument(
    skip(db, plan, scope),
    fields(table = plan.table, connection_id = scope.connection_id, scope_id = %scope.scope_id)
)]
pub async fn dedup_scope<C>(db: &C, plan: &DedupPlan, scope: &ScopeKey) -> Result<u64, DedupError>
where
    C: ConnectionTrait,
{
    scope.validate()?;

    let stmt = plan.delete_statement(db.get_database_backend(), scope);
    let deleted = db.execute(stmt).await?.rows_affected();

    counter!("reconciler_dedup_deleted_total", "table" => plan.table).increment(deleted);
    info!(deleted, "Deduplicated staged records");

    Ok(deleted)
}

/// Keep the latest row per deployment key for this repository scope.
pub async fn dedup_deployments<C>(db: &C, scope: &ScopeKey) -> Result<u64, DedupError>
where
    C: ConnectionTrait,
{
    dedup_scope(db, &DEPLOYMENT_DEDUP_PLAN, scope).await
}
