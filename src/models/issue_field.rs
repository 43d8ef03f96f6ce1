//! IssueField entity model
//!
//! Field metadata discovered from the remote system's schema API, one row per
//! field and scope.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "issue_fields")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub connection_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub scope_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub field_id: String,

    pub name: Option<String>,

    /// Declared schema type, e.g. `date`, `datetime`, `string`
    pub schema_type: Option<String>,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
