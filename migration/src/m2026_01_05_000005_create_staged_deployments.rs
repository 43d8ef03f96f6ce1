//! Migration to create the staged_deployments table and its dedup lookup index

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StagedDeployments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StagedDeployments::ConnectionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StagedDeployments::Id).string().not_null())
                    .col(ColumnDef::new(StagedDeployments::ScopeId).string().not_null())
                    .col(ColumnDef::new(StagedDeployments::Name).string())
                    .col(ColumnDef::new(StagedDeployments::Environment).string())
                    .col(ColumnDef::new(StagedDeployments::State).string())
                    .col(ColumnDef::new(StagedDeployments::RefName).string())
                    .col(ColumnDef::new(StagedDeployments::CommitOid).string())
                    .col(ColumnDef::new(StagedDeployments::CreatedDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(StagedDeployments::UpdatedDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(StagedDeployments::LatestUpdatedDate)
                            .timestamp_with_time_zone(),
                    )
                    .primary_key(
                        Index::create()
                            .col(StagedDeployments::ConnectionId)
                            .col(StagedDeployments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_staged_deployments_dedup_key")
                    .table(StagedDeployments::Table)
                    .col(StagedDeployments::ConnectionId)
                    .col(StagedDeployments::ScopeId)
                    .col(StagedDeployments::RefName)
                    .col(StagedDeployments::CommitOid)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StagedDeployments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StagedDeployments {
    Table,
    ConnectionId,
    Id,
    ScopeId,
    Name,
    Environment,
    State,
    RefName,
    CommitOid,
    CreatedDate,
    UpdatedDate,
    LatestUpdatedDate,
}
