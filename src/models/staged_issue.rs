//! StagedIssue entity model
//!
//! Raw issue as written by the issue collector. `fields` holds every raw
//! attribute, including custom fields, exactly as the remote API returned it.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staged_issues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub connection_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub issue_id: String,

    /// Board the issue was collected for
    pub scope_id: String,

    pub issue_key: String,

    /// Raw issue type id, classified through the scope's type mappings
    pub type_id: String,

    pub created: DateTimeWithTimeZone,
    pub resolution_date: Option<DateTimeWithTimeZone>,

    #[sea_orm(column_type = "JsonBinary")]
    pub fields: JsonValue,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
