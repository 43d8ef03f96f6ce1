//! Temporal attribute resolution for staged issues.
//!
//! An issue's effective start defaults to its creation time and its effective
//! stop to its resolution date. For issues classified as incidents, a scope may
//! name custom fields that override either slot. A custom field is only used
//! when the discovered field schema declares it as a date/datetime and the raw
//! value parses as a timestamp; otherwise the default for that slot is kept.
//!
//! Every function here is pure and total.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value as JsonValue;

use crate::classify::{TypeMappings, should_override_incident_timestamps};

/// Schema type names that carry timestamps.
const TIMESTAMP_SCHEMA_TYPES: &[&str] = &["date", "datetime"];

/// Datetime layout used by issue trackers that omit the colon in the offset.
const OFFSET_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Configured custom field names for the start and stop slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFields {
    start_field: Option<String>,
    stop_field: Option<String>,
}

impl IncidentFields {
    /// Blank names are stored as "not configured".
    pub fn new(start_field: Option<String>, stop_field: Option<String>) -> Self {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            start_field: clean(start_field),
            stop_field: clean(stop_field),
        }
    }

    pub fn start_field(&self) -> Option<&str> {
        self.start_field.as_deref()
    }

    pub fn stop_field(&self) -> Option<&str> {
        self.stop_field.as_deref()
    }
}

/// Field id → declared schema type, as discovered for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTypeMap {
    types: HashMap<String, String>,
}

impl FieldTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, field_id: K, schema_type: V) {
        self.types.insert(field_id.into(), schema_type.into());
    }

    pub fn schema_type(&self, field_id: &str) -> Option<&str> {
        self.types.get(field_id).map(String::as_str)
    }

    /// True when the field is known and declared with a timestamp type.
    pub fn is_timestamp_field(&self, field_id: &str) -> bool {
        self.schema_type(field_id).is_some_and(is_timestamp_type)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldTypeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// `date` and `datetime`, compared ASCII-case-insensitively.
pub fn is_timestamp_type(schema_type: &str) -> bool {
    TIMESTAMP_SCHEMA_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(schema_type))
}

/// Parse a raw field value as a timestamp.
///
/// Accepts RFC 3339, `2025-01-01T01:00:00.000+0000` and plain dates (midnight UTC).
/// Non-string values and unparseable strings yield `None`.
pub fn parse_field_timestamp(value: &JsonValue) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, OFFSET_DATETIME_FORMAT) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// The override for one slot, if the field is configured, timestamp-typed and parseable.
fn field_override(
    field: Option<&str>,
    fields: &JsonValue,
    field_types: &FieldTypeMap,
) -> Option<DateTime<Utc>> {
    let field = field?;
    if !field_types.is_timestamp_field(field) {
        return None;
    }
    fields.get(field).and_then(parse_field_timestamp)
}

/// Resolve the start/stop window ignoring classification.
///
/// Each slot falls back independently: `created` for start, `default_stop` for stop.
pub fn resolve_incident_window(
    created: DateTime<Utc>,
    default_stop: Option<DateTime<Utc>>,
    fields: &JsonValue,
    incident_fields: &IncidentFields,
    field_types: &FieldTypeMap,
) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
    let start = field_override(incident_fields.start_field(), fields, field_types)
        .unwrap_or(created);
    let stop = field_override(incident_fields.stop_field(), fields, field_types).or(default_stop);
    (start, stop)
}

/// Everything the resolver reads for one record. All inputs are immutable snapshots.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub created: DateTime<Utc>,
    pub default_stop: Option<DateTime<Utc>>,
    /// Raw field set of the record (a JSON object)
    pub fields: &'a JsonValue,
    pub incident_fields: &'a IncidentFields,
    pub field_types: &'a FieldTypeMap,
    pub type_id: &'a str,
    pub type_mappings: Option<&'a TypeMappings>,
}

/// Resolve the effective `(start, stop)` pair.
///
/// Records not classified as incidents get `(created, default_stop)` untouched.
pub fn resolve(input: &ResolveInput<'_>) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
    if !should_override_incident_timestamps(input.type_id, input.type_mappings) {
        return (input.created, input.default_stop);
    }
    resolve_incident_window(
        input.created,
        input.default_stop,
        input.fields,
        input.incident_fields,
        input.field_types,
    )
}

/// Whole minutes between start and stop, truncated.
///
/// Absent when there is no stop or the stop precedes the start.
pub fn duration_minutes(start: DateTime<Utc>, stop: Option<DateTime<Utc>>) -> Option<i64> {
    let stop = stop?;
    if stop < start {
        return None;
    }
    Some((stop - start).num_minutes())
}

/// Derived attributes written to the domain-layer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedTemporal {
    pub effective_start: DateTime<Utc>,
    pub effective_stop: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
}

/// Resolve the window and derive the duration in one pass.
pub fn derive(input: &ResolveInput<'_>) -> DerivedTemporal {
    let (effective_start, effective_stop) = resolve(input);
    DerivedTemporal {
        effective_start,
        effective_stop,
        duration_minutes: duration_minutes(effective_start, effective_stop),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, h, m, 0).unwrap()
    }

    fn incident_fields() -> IncidentFields {
        IncidentFields::new(
            Some("customfield_start".to_string()),
            Some("customfield_stop".to_string()),
        )
    }

    fn timestamp_types() -> FieldTypeMap {
        [("customfield_start", "date"), ("customfield_stop", "datetime")]
            .into_iter()
            .collect()
    }

    fn incident_mappings() -> TypeMappings {
        TypeMappings {
            type_id_mappings: HashMap::from([
                ("10001".to_string(), "Incident".to_string()),
                ("10002".to_string(), "Bug".to_string()),
            ]),
            std_type_mappings: HashMap::from([
                ("Incident".to_string(), "INCIDENT".to_string()),
                ("Bug".to_string(), "BUG".to_string()),
            ]),
        }
    }

    #[test]
    fn timestamp_schema_types() {
        let cases = [
            ("date", true),
            ("datetime", true),
            ("DateTime", true),
            ("DATE", true),
            ("string", false),
            ("number", false),
            ("", false),
        ];
        for (schema_type, want) in cases {
            assert_eq!(is_timestamp_type(schema_type), want, "{schema_type:?}");
        }
    }

    #[test]
    fn configured_field_must_be_timestamp_typed() {
        let mut types = FieldTypeMap::new();
        types.insert("customfield_10001", "datetime");
        types.insert("customfield_10003", "string");

        assert!(types.is_timestamp_field("customfield_10001"));
        assert!(!types.is_timestamp_field("customfield_10002"));
        assert!(!types.is_timestamp_field("customfield_10003"));
        assert!(!FieldTypeMap::new().is_timestamp_field("customfield_10001"));
    }

    #[test]
    fn parses_supported_timestamp_layouts() {
        assert_eq!(parse_field_timestamp(&json!("2025-01-01T01:00:00Z")), Some(at(1, 0)));
        assert_eq!(
            parse_field_timestamp(&json!("2025-01-01T03:00:00.000+0200")),
            Some(at(1, 0))
        );
        assert_eq!(parse_field_timestamp(&json!("2025-01-01")), Some(at(0, 0)));
    }

    #[test]
    fn rejects_malformed_timestamp_values() {
        assert_eq!(parse_field_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_field_timestamp(&json!("")), None);
        assert_eq!(parse_field_timestamp(&json!(1735693200)), None);
        assert_eq!(parse_field_timestamp(&JsonValue::Null), None);
    }

    #[test]
    fn custom_fields_override_defaults() {
        let fields = json!({
            "customfield_start": "2025-01-01T01:00:00Z",
            "customfield_stop": "2025-01-01T02:30:00Z",
        });
        let (start, stop) = resolve_incident_window(
            at(0, 0),
            Some(at(3, 0)),
            &fields,
            &incident_fields(),
            &timestamp_types(),
        );
        assert_eq!(start, at(1, 0));
        assert_eq!(stop, Some(at(2, 30)));
    }

    #[test]
    fn untyped_fields_fall_back_to_defaults() {
        let fields = json!({
            "customfield_start": "2025-01-01T01:00:00Z",
            "customfield_stop": "2025-01-01T02:30:00Z",
        });
        let (start, stop) = resolve_incident_window(
            at(0, 0),
            Some(at(3, 0)),
            &fields,
            &incident_fields(),
            &FieldTypeMap::new(),
        );
        assert_eq!(start, at(0, 0));
        assert_eq!(stop, Some(at(3, 0)));
    }

    #[test]
    fn non_timestamp_typed_field_never_overrides() {
        let fields = json!({ "customfield_start": "2025-01-01T01:00:00Z" });
        let types: FieldTypeMap = [("customfield_start", "string")].into_iter().collect();
        let (start, _) = resolve_incident_window(
            at(0, 0),
            None,
            &fields,
            &incident_fields(),
            &types,
        );
        assert_eq!(start, at(0, 0));
    }

    #[test]
    fn slots_fall_back_independently() {
        let fields = json!({
            "customfield_start": "not a date",
            "customfield_stop": "2025-01-01T02:30:00Z",
        });
        let (start, stop) = resolve_incident_window(
            at(0, 0),
            None,
            &fields,
            &incident_fields(),
            &timestamp_types(),
        );
        assert_eq!(start, at(0, 0));
        assert_eq!(stop, Some(at(2, 30)));
    }

    #[test]
    fn missing_stop_value_keeps_absent_default() {
        let fields = json!({ "customfield_start": "2025-01-01T01:00:00Z" });
        let (start, stop) = resolve_incident_window(
            at(0, 0),
            None,
            &fields,
            &incident_fields(),
            &timestamp_types(),
        );
        assert_eq!(start, at(1, 0));
        assert_eq!(stop, None);
    }

    #[test]
    fn blank_field_names_are_not_configured() {
        let fields = IncidentFields::new(Some("  ".to_string()), Some(String::new()));
        assert_eq!(fields.start_field(), None);
        assert_eq!(fields.stop_field(), None);
    }

    #[test]
    fn non_incident_types_keep_defaults() {
        let raw = json!({
            "customfield_start": "2025-01-01T01:00:00Z",
            "customfield_stop": "2025-01-01T02:30:00Z",
        });
        let fields = incident_fields();
        let types = timestamp_types();
        let mappings = incident_mappings();

        for (type_id, type_mappings) in [
            ("10002", Some(&mappings)),
            ("unknown", Some(&mappings)),
            ("10001", None),
        ] {
            let input = ResolveInput {
                created: at(0, 0),
                default_stop: Some(at(3, 0)),
                fields: &raw,
                incident_fields: &fields,
                field_types: &types,
                type_id,
                type_mappings,
            };
            assert_eq!(resolve(&input), (at(0, 0), Some(at(3, 0))), "type {type_id}");
        }
    }

    #[test]
    fn incident_types_apply_overrides_and_duration() {
        let raw = json!({
            "customfield_start": "2025-01-01T01:00:00Z",
            "customfield_stop": "2025-01-01T02:30:00Z",
        });
        let fields = incident_fields();
        let types = timestamp_types();
        let mappings = incident_mappings();
        let input = ResolveInput {
            created: at(0, 0),
            default_stop: Some(at(3, 0)),
            fields: &raw,
            incident_fields: &fields,
            field_types: &types,
            type_id: "10001",
            type_mappings: Some(&mappings),
        };

        let derived = derive(&input);
        assert_eq!(derived.effective_start, at(1, 0));
        assert_eq!(derived.effective_stop, Some(at(2, 30)));
        assert_eq!(derived.duration_minutes, Some(90));
    }

    #[test]
    fn duration_is_truncated_whole_minutes() {
        let start = at(0, 0);
        assert_eq!(duration_minutes(start, Some(at(2, 15))), Some(135));
        assert_eq!(
            duration_minutes(start, Some(start + chrono::Duration::seconds(119))),
            Some(1)
        );
        assert_eq!(duration_minutes(start, Some(start)), Some(0));
    }

    #[test]
    fn duration_absent_without_valid_stop() {
        let start = at(0, 0);
        assert_eq!(duration_minutes(start, None), None);
        let before = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(duration_minutes(start, Some(before)), None);
    }
}
