//! Migration to create the scope_configs table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScopeConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScopeConfigs::ConnectionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScopeConfigs::ScopeId).string().not_null())
                    .col(ColumnDef::new(ScopeConfigs::RemotelinkCommitShaPattern).string())
                    .col(ColumnDef::new(ScopeConfigs::TypeMappings).json_binary())
                    .col(
                        ColumnDef::new(ScopeConfigs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScopeConfigs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(ScopeConfigs::ConnectionId)
                            .col(ScopeConfigs::ScopeId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScopeConfigs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScopeConfigs {
    Table,
    ConnectionId,
    ScopeId,
    RemotelinkCommitShaPattern,
    TypeMappings,
    CreatedAt,
    UpdatedAt,
}
