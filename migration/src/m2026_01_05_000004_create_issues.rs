//! Migration to create the issues table carrying derived temporal attributes

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Issues::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Issues::ConnectionId).big_integer().not_null())
                    .col(ColumnDef::new(Issues::IssueId).string().not_null())
                    .col(ColumnDef::new(Issues::ScopeId).string().not_null())
                    .col(ColumnDef::new(Issues::IssueKey).string().not_null())
                    .col(ColumnDef::new(Issues::StdType).string())
                    .col(
                        ColumnDef::new(Issues::EffectiveStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Issues::EffectiveStop).timestamp_with_time_zone())
                    .col(ColumnDef::new(Issues::DurationMinutes).big_integer())
                    .col(
                        ColumnDef::new(Issues::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(Issues::ConnectionId)
                            .col(Issues::IssueId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Issues::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Issues {
    Table,
    ConnectionId,
    IssueId,
    ScopeId,
    IssueKey,
    StdType,
    EffectiveStart,
    EffectiveStop,
    DurationMinutes,
    UpdatedAt,
}
