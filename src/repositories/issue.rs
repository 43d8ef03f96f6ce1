//! # Issue Repository
//!
//! Access to raw staged issues and to the derived domain-layer issues.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::error::RepositoryError;
use crate::models::issue::{self, Entity as Issue};
use crate::models::staged_issue::{self, Entity as StagedIssue};
use crate::scope::ScopeKey;

/// Repository for staged and derived issues
pub struct IssueRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> IssueRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write a staged issue the way a collector does: the latest pull overwrites the row
    pub async fn upsert_staged(&self, staged: staged_issue::Model) -> Result<(), RepositoryError> {
        let row = staged_issue::ActiveModel {
            connection_id: Set(staged.connection_id),
            issue_id: Set(staged.issue_id),
            scope_id: Set(staged.scope_id),
            issue_key: Set(staged.issue_key),
            type_id: Set(staged.type_id),
            created: Set(staged.created),
            resolution_date: Set(staged.resolution_date),
            fields: Set(staged.fields),
            updated_at: Set(staged.updated_at),
        };

        StagedIssue::insert(row)
            .on_conflict(
                OnConflict::columns([
                    staged_issue::Column::ConnectionId,
                    staged_issue::Column::IssueId,
                ])
                .update_columns([
                    staged_issue::Column::ScopeId,
                    staged_issue::Column::IssueKey,
                    staged_issue::Column::TypeId,
                    staged_issue::Column::Created,
                    staged_issue::Column::ResolutionDate,
                    staged_issue::Column::Fields,
                    staged_issue::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// One page of staged issues in issue id order, starting after `after_issue_id`
    pub async fn staged_page(
        &self,
        scope: &ScopeKey,
        after_issue_id: Option<&str>,
        limit: u64,
    ) -> Result<Vec<staged_issue::Model>, RepositoryError> {
        let mut query = StagedIssue::find()
            .filter(staged_issue::Column::ConnectionId.eq(scope.connection_id))
            .filter(staged_issue::Column::ScopeId.eq(scope.scope_id.as_str()));
        if let Some(after) = after_issue_id {
            query = query.filter(staged_issue::Column::IssueId.gt(after));
        }

        query
            .order_by_asc(staged_issue::Column::IssueId)
            .limit(limit)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Insert or fully overwrite a derived issue
    pub async fn upsert_derived(&self, derived: issue::Model) -> Result<(), RepositoryError> {
        let row = issue::ActiveModel {
            connection_id: Set(derived.connection_id),
            issue_id: Set(derived.issue_id),
            scope_id: Set(derived.scope_id),
            issue_key: Set(derived.issue_key),
            std_type: Set(derived.std_type),
            effective_start: Set(derived.effective_start),
            effective_stop: Set(derived.effective_stop),
            duration_minutes: Set(derived.duration_minutes),
            updated_at: Set(derived.updated_at),
        };

        Issue::insert(row)
            .on_conflict(
                OnConflict::columns([issue::Column::ConnectionId, issue::Column::IssueId])
                    .update_columns([
                        issue::Column::ScopeId,
                        issue::Column::IssueKey,
                        issue::Column::StdType,
                        issue::Column::EffectiveStart,
                        issue::Column::EffectiveStop,
                        issue::Column::DurationMinutes,
                        issue::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Look up one derived issue
    pub async fn find_derived(
        &self,
        connection_id: i64,
        issue_id: &str,
    ) -> Result<Option<issue::Model>, RepositoryError> {
        Issue::find_by_id((connection_id, issue_id.to_string()))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Derived issues of a scope, in issue id order
    pub async fn derived_for_scope(
        &self,
        scope: &ScopeKey,
    ) -> Result<Vec<issue::Model>, RepositoryError> {
        Issue::find()
            .filter(issue::Column::ConnectionId.eq(scope.connection_id))
            .filter(issue::Column::ScopeId.eq(scope.scope_id.as_str()))
            .order_by_asc(issue::Column::IssueId)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
