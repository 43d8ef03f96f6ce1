//! Migration to create the staged_issues table written by the issue collector

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StagedIssues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StagedIssues::ConnectionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StagedIssues::IssueId).string().not_null())
                    .col(ColumnDef::new(StagedIssues::ScopeId).string().not_null())
                    .col(ColumnDef::new(StagedIssues::IssueKey).string().not_null())
                    .col(ColumnDef::new(StagedIssues::TypeId).string().not_null())
                    .col(
                        ColumnDef::new(StagedIssues::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StagedIssues::ResolutionDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(StagedIssues::Fields).json_binary().not_null())
                    .col(
                        ColumnDef::new(StagedIssues::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(StagedIssues::ConnectionId)
                            .col(StagedIssues::IssueId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_staged_issues_scope")
                    .table(StagedIssues::Table)
                    .col(StagedIssues::ConnectionId)
                    .col(StagedIssues::ScopeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StagedIssues::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StagedIssues {
    Table,
    ConnectionId,
    IssueId,
    ScopeId,
    IssueKey,
    TypeId,
    Created,
    ResolutionDate,
    Fields,
    UpdatedAt,
}
