//! Adds the configurable incident start and stop field names to scope_configs.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite rejects multiple alter options in one statement.
        manager
            .alter_table(
                Table::alter()
                    .table(ScopeConfigs::Table)
                    .add_column(ColumnDef::new(ScopeConfigs::IncidentStartField).string_len(255))
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(ScopeConfigs::Table)
                    .add_column(ColumnDef::new(ScopeConfigs::IncidentStopField).string_len(255))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(ScopeConfigs::Table)
                    .drop_column(ScopeConfigs::IncidentStopField)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(ScopeConfigs::Table)
                    .drop_column(ScopeConfigs::IncidentStartField)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ScopeConfigs {
    Table,
    IncidentStartField,
    IncidentStopField,
}
