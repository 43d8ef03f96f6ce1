//! Issue entity model
//!
//! Domain-layer issue consumed by downstream aggregation. The temporal
//! columns are recomputed and fully overwritten on every extraction pass.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "issues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub connection_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub issue_id: String,

    pub scope_id: String,
    pub issue_key: String,

    /// Standardized category, absent when the type is unmapped
    pub std_type: Option<String>,

    pub effective_start: DateTimeWithTimeZone,
    pub effective_stop: Option<DateTimeWithTimeZone>,
    pub duration_minutes: Option<i64>,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
