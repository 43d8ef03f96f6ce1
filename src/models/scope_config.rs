//! # Scope Configuration Model
//!
//! Per-scope configuration owned by configuration management. The pipeline
//! stages only ever read it.

use std::sync::OnceLock;

use regex::Regex;
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::classify::TypeMappings;
use crate::temporal::IncidentFields;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scope_configs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub connection_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub scope_id: String,

    /// Regex extracting commit SHAs from issue remote links
    pub remotelink_commit_sha_pattern: Option<String>,

    /// Serialized [`TypeMappings`]
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub type_mappings: Option<JsonValue>,

    /// Custom field overriding the incident start time
    pub incident_start_field: Option<String>,

    /// Custom field overriding the incident stop time
    pub incident_stop_field: Option<String>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Validation failures for a scope configuration write.
#[derive(Debug, Error)]
pub enum ScopeConfigError {
    #[error("invalid remote link commit sha pattern: {source}")]
    InvalidPattern {
        #[from]
        source: regex::Error,
    },
    #[error("invalid {slot} field name '{value}'")]
    InvalidFieldName { slot: &'static str, value: String },
}

fn field_name_re() -> &'static Regex {
    static FIELD_NAME_RE: OnceLock<Regex> = OnceLock::new();
    FIELD_NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid field name regex"))
}

/// Editable part of a scope configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeConfigInput {
    pub remotelink_commit_sha_pattern: Option<String>,
    pub type_mappings: Option<TypeMappings>,
    pub incident_start_field: Option<String>,
    pub incident_stop_field: Option<String>,
}

impl ScopeConfigInput {
    /// Checks the pattern compiles and that configured field names are well-formed.
    ///
    /// Blank values are treated as "not configured".
    pub fn validate(&self) -> Result<(), ScopeConfigError> {
        if let Some(pattern) = non_blank(&self.remotelink_commit_sha_pattern) {
            Regex::new(pattern)?;
        }

        for (slot, value) in [
            ("incident start", &self.incident_start_field),
            ("incident stop", &self.incident_stop_field),
        ] {
            if let Some(name) = non_blank(value)
                && !field_name_re().is_match(name)
            {
                return Err(ScopeConfigError::InvalidFieldName {
                    slot,
                    value: name.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Model {
    /// Incident field names as a plain value for the resolver.
    pub fn incident_fields(&self) -> IncidentFields {
        IncidentFields::new(
            self.incident_start_field.clone(),
            self.incident_stop_field.clone(),
        )
    }

    /// Decoded type mappings; `None` when the scope has none configured.
    pub fn type_mappings(&self) -> Result<Option<TypeMappings>, serde_json::Error> {
        match &self.type_mappings {
            None | Some(JsonValue::Null) => Ok(None),
            Some(json) => serde_json::from_value(json.clone()).map(Some),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
