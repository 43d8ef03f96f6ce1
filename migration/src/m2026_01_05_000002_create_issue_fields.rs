//! Migration to create the issue_fields table holding discovered field schemas

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IssueFields::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IssueFields::ConnectionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IssueFields::ScopeId).string().not_null())
                    .col(ColumnDef::new(IssueFields::FieldId).string().not_null())
                    .col(ColumnDef::new(IssueFields::Name).string())
                    .col(ColumnDef::new(IssueFields::SchemaType).string())
                    .col(
                        ColumnDef::new(IssueFields::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(IssueFields::ConnectionId)
                            .col(IssueFields::ScopeId)
                            .col(IssueFields::FieldId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IssueFields::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum IssueFields {
    Table,
    ConnectionId,
    ScopeId,
    FieldId,
    Name,
    SchemaType,
    UpdatedAt,
}
