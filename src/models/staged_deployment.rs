//! StagedDeployment entity model
//!
//! One CI/CD deployment as last written by the deployment collector. Paginated
//! pulls may write several rows for the same logical deployment; the
//! deduplication stage collapses them.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staged_deployments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub connection_id: i64,

    /// Deployment id assigned by the remote system
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Remote repository id
    pub scope_id: String,

    pub name: Option<String>,
    pub environment: Option<String>,
    pub state: Option<String>,
    pub ref_name: Option<String>,
    pub commit_oid: Option<String>,
    pub created_date: Option<DateTimeWithTimeZone>,
    pub updated_date: Option<DateTimeWithTimeZone>,

    /// Update time of the latest deployment status; preferred over `updated_date`
    pub latest_updated_date: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
