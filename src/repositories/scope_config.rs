//! # Scope Configuration Repository
//!
//! Reads and writes per-scope configuration. Writes are validated; reads
//! return the stored value as-is.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

use crate::error::RepositoryError;
use crate::models::scope_config::{
    ActiveModel as ScopeConfigActiveModel, Entity as ScopeConfig, Model as ScopeConfigModel,
    ScopeConfigInput,
};
use crate::scope::ScopeKey;

/// Repository for scope configuration database operations
pub struct ScopeConfigRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ScopeConfigRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get the configuration for a scope, if one was saved
    pub async fn get(&self, scope: &ScopeKey) -> Result<Option<ScopeConfigModel>, RepositoryError> {
        ScopeConfig::find_by_id((scope.connection_id, scope.scope_id.clone()))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Create or replace the editable part of a scope's configuration
    pub async fn save(
        &self,
        scope: &ScopeKey,
        input: ScopeConfigInput,
    ) -> Result<ScopeConfigModel, RepositoryError> {
        input
            .validate()
            .map_err(|e| RepositoryError::validation_error(e.to_string()))?;

        let type_mappings = input
            .type_mappings
            .map(serde_json::to_value)
            .transpose()
            .map_err(|source| RepositoryError::InvalidJson {
                column: "type_mappings",
                source,
            })?;
        let now = Utc::now().fixed_offset();

        let result = match self.get(scope).await? {
            Some(existing) => {
                let mut config = existing.into_active_model();
                config.remotelink_commit_sha_pattern = Set(input.remotelink_commit_sha_pattern);
                config.type_mappings = Set(type_mappings);
                config.incident_start_field = Set(input.incident_start_field);
                config.incident_stop_field = Set(input.incident_stop_field);
                config.updated_at = Set(now);
                config.update(self.db).await
            }
            None => {
                ScopeConfigActiveModel {
                    connection_id: Set(scope.connection_id),
                    scope_id: Set(scope.scope_id.clone()),
                    remotelink_commit_sha_pattern: Set(input.remotelink_commit_sha_pattern),
                    type_mappings: Set(type_mappings),
                    incident_start_field: Set(input.incident_start_field),
                    incident_stop_field: Set(input.incident_stop_field),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(self.db)
                .await
            }
        }
        .map_err(RepositoryError::database_error)?;

        tracing::info!(
            connection_id = scope.connection_id,
            scope_id = %scope.scope_id,
            "Scope configuration saved"
        );

        Ok(result)
    }
}
