//! # Issue Field Repository
//!
//! Field metadata is written by the schema-discovery collector and read as a
//! [`FieldTypeMap`] snapshot before resolution runs.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::error::RepositoryError;
use crate::models::issue_field::{ActiveModel, Column, Entity as IssueField};
use crate::scope::ScopeKey;
use crate::temporal::FieldTypeMap;

/// Repository for discovered issue field metadata
pub struct IssueFieldRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> IssueFieldRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record (or refresh) one discovered field
    pub async fn upsert_field(
        &self,
        scope: &ScopeKey,
        field_id: &str,
        name: Option<&str>,
        schema_type: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let field = ActiveModel {
            connection_id: Set(scope.connection_id),
            scope_id: Set(scope.scope_id.clone()),
            field_id: Set(field_id.to_string()),
            name: Set(name.map(str::to_string)),
            schema_type: Set(schema_type.map(str::to_string)),
            updated_at: Set(Utc::now().fixed_offset()),
        };

        IssueField::insert(field)
            .on_conflict(
                OnConflict::columns([Column::ConnectionId, Column::ScopeId, Column::FieldId])
                    .update_columns([Column::Name, Column::SchemaType, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Snapshot of field id → schema type for a scope; fields without a type are skipped
    pub async fn field_type_map(&self, scope: &ScopeKey) -> Result<FieldTypeMap, RepositoryError> {
        let fields = IssueField::find()
            .filter(Column::ConnectionId.eq(scope.connection_id))
            .filter(Column::ScopeId.eq(scope.scope_id.as_str()))
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(fields
            .into_iter()
            .filter_map(|f| f.schema_type.map(|t| (f.field_id, t)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    #[tokio::test]
    async fn test_field_type_map_is_scoped_and_refreshed() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();
        let repo = IssueFieldRepository::new(&db);
        let scope = ScopeKey::new(1, "board-1");
        let other = ScopeKey::new(1, "board-2");

        repo.upsert_field(&scope, "customfield_start", Some("Start"), Some("string"))
            .await
            .unwrap();
        repo.upsert_field(&scope, "customfield_start", Some("Start"), Some("datetime"))
            .await
            .unwrap();
        repo.upsert_field(&scope, "labels", Some("Labels"), None)
            .await
            .unwrap();
        repo.upsert_field(&other, "customfield_stop", None, Some("date"))
            .await
            .unwrap();

        let map = repo.field_type_map(&scope).await.unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.is_timestamp_field("customfield_start"));
        assert!(!map.is_timestamp_field("customfield_stop"));
    }
}
