//! # Deployment Repository
//!
//! Staged deployment access for collectors and for inspecting dedup results.

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::error::RepositoryError;
use crate::models::staged_deployment::{ActiveModel, Column, Entity as StagedDeployment, Model};
use crate::scope::ScopeKey;

/// Repository for staged deployment rows
pub struct DeploymentRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DeploymentRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write a staged deployment; a row with the same identity is overwritten.
    ///
    /// Timestamps are stored in UTC so recency compares as instants on text backends.
    pub async fn upsert_staged(&self, deployment: Model) -> Result<(), RepositoryError> {
        let row = ActiveModel {
            connection_id: Set(deployment.connection_id),
            id: Set(deployment.id),
            scope_id: Set(deployment.scope_id),
            name: Set(deployment.name),
            environment: Set(deployment.environment),
            state: Set(deployment.state),
            ref_name: Set(deployment.ref_name),
            commit_oid: Set(deployment.commit_oid),
            created_date: Set(deployment.created_date.map(to_utc)),
            updated_date: Set(deployment.updated_date.map(to_utc)),
            latest_updated_date: Set(deployment.latest_updated_date.map(to_utc)),
        };

        StagedDeployment::insert(row)
            .on_conflict(
                OnConflict::columns([Column::ConnectionId, Column::Id])
                    .update_columns([
                        Column::ScopeId,
                        Column::Name,
                        Column::Environment,
                        Column::State,
                        Column::RefName,
                        Column::CommitOid,
                        Column::CreatedDate,
                        Column::UpdatedDate,
                        Column::LatestUpdatedDate,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// All staged deployments of a scope, in id order
    pub async fn list_for_scope(&self, scope: &ScopeKey) -> Result<Vec<Model>, RepositoryError> {
        StagedDeployment::find()
            .filter(Column::ConnectionId.eq(scope.connection_id))
            .filter(Column::ScopeId.eq(scope.scope_id.as_str()))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

fn to_utc(ts: DateTimeWithTimeZone) -> DateTimeWithTimeZone {
    ts.with_timezone(&Utc).fixed_offset()
}
