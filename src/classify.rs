//! Issue type classification.
//!
//! A raw issue type id is mapped to a standardized category through two
//! chained lookups: type id → display name, then display name → category.
//! Any missing link yields "no category", never an error.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of standardized issue categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardType {
    Requirement,
    Bug,
    Incident,
    Epic,
    Task,
    Subtask,
}

impl StandardType {
    /// Return the canonical string representation for this category.
    pub const fn as_str(self) -> &'static str {
        match self {
            StandardType::Requirement => "REQUIREMENT",
            StandardType::Bug => "BUG",
            StandardType::Incident => "INCIDENT",
            StandardType::Epic => "EPIC",
            StandardType::Task => "TASK",
            StandardType::Subtask => "SUBTASK",
        }
    }
}

impl fmt::Display for StandardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete registry of standardized categories.
pub const ALL_STANDARD_TYPES: &[StandardType] = &[
    StandardType::Requirement,
    StandardType::Bug,
    StandardType::Incident,
    StandardType::Epic,
    StandardType::Task,
    StandardType::Subtask,
];

/// Parse a configured category name. Surrounding whitespace and ASCII case are ignored.
pub fn parse_standard_type(raw: &str) -> Option<StandardType> {
    let raw = raw.trim();
    ALL_STANDARD_TYPES
        .iter()
        .copied()
        .find(|t| t.as_str().eq_ignore_ascii_case(raw))
}

/// User-defined type taxonomy for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMappings {
    /// Raw type id → type display name
    #[serde(default)]
    pub type_id_mappings: HashMap<String, String>,
    /// Type display name → standardized category name
    #[serde(default)]
    pub std_type_mappings: HashMap<String, String>,
}

/// Classify a raw type id; `None` means "do not apply type-specific behavior".
pub fn classify(raw_type_id: &str, mappings: Option<&TypeMappings>) -> Option<StandardType> {
    let mappings = mappings?;
    let name = mappings.type_id_mappings.get(raw_type_id)?;
    let category = mappings.std_type_mappings.get(name)?;
    parse_standard_type(category)
}

/// Custom incident timestamps only apply to issues classified as incidents.
pub fn should_override_incident_timestamps(
    raw_type_id: &str,
    mappings: Option<&TypeMappings>,
) -> bool {
    classify(raw_type_id, mappings) == Some(StandardType::Incident)
}
