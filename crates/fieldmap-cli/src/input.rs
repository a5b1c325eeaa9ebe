//! Reading column and field lists from JSON.
//!
//! Both inputs are JSON arrays of objects. Parsing is lenient: a root that
//! is not an array yields an empty list, and entries without a usable
//! `name` are skipped. Each case logs a warning.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fieldmap_engine::domain_relevance;
use fieldmap_model::{
    ColumnType, FieldCategory, MAX_SAMPLE_VALUES, SourceColumn, TargetField, check_unique_names,
};
use serde_json::{Map, Value};
use tracing::warn;

/// Reads a JSON file into a [`Value`].
pub fn read_json(path: &Path) -> Result<Value> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse JSON in {}", path.display()))
}

pub fn load_columns(path: &Path) -> Result<Vec<SourceColumn>> {
    Ok(columns_from_json(&read_json(path)?))
}

pub fn load_fields(path: &Path) -> Result<Vec<TargetField>> {
    Ok(fields_from_json(&read_json(path)?))
}

/// Builds source columns from a JSON array.
///
/// A missing or unknown `inferred_type` is inferred from `sample_values`.
pub fn columns_from_json(value: &Value) -> Vec<SourceColumn> {
    let columns: Vec<SourceColumn> = entries(value, "column")
        .filter_map(|(index, object)| {
            let name = entry_name(index, object, "column")?;
            let samples = sample_values(object.get("sample_values"));
            let declared = object
                .get("inferred_type")
                .and_then(Value::as_str)
                .and_then(|raw| match raw.parse::<ColumnType>() {
                    Ok(ty) => Some(ty),
                    Err(error) => {
                        warn!(column = %name, %error, "ignoring declared type");
                        None
                    }
                });
            Some(match declared {
                Some(ty) => SourceColumn::new(name, ty).with_samples(samples),
                None => SourceColumn::from_samples(name, samples),
            })
        })
        .collect();
    warn_on_duplicates("column", columns.iter().map(|c| c.name.as_str()));
    columns
}

/// Builds target fields from a JSON array.
///
/// `type` defaults to text, `category` to uncategorized, and a missing
/// `domain_relevance` is computed from the field name.
pub fn fields_from_json(value: &Value) -> Vec<TargetField> {
    let fields: Vec<TargetField> = entries(value, "field")
        .filter_map(|(index, object)| {
            let name = entry_name(index, object, "field")?;
            let field_type = match object.get("type").and_then(Value::as_str) {
                Some(raw) => raw.parse::<ColumnType>().unwrap_or_else(|error| {
                    warn!(field = %name, %error, "unknown field type, using text");
                    ColumnType::Text
                }),
                None => ColumnType::Text,
            };
            let category = match object.get("category").and_then(Value::as_str) {
                Some(raw) => raw.parse::<FieldCategory>().unwrap_or_else(|error| {
                    warn!(field = %name, %error, "unknown category");
                    FieldCategory::Uncategorized
                }),
                None => FieldCategory::Uncategorized,
            };
            let relevance = object
                .get("domain_relevance")
                .and_then(Value::as_f64)
                .unwrap_or_else(|| domain_relevance(&name));
            Some(
                TargetField::new(name, field_type)
                    .with_category(category)
                    .with_relevance(relevance),
            )
        })
        .collect();
    warn_on_duplicates("field", fields.iter().map(|f| f.name.as_str()));
    fields
}

fn entries<'a>(
    value: &'a Value,
    kind: &'static str,
) -> impl Iterator<Item = (usize, &'a Map<String, Value>)> {
    let items: &[Value] = match value.as_array() {
        Some(items) => items.as_slice(),
        None => {
            warn!(kind, "expected a JSON array of {kind}s, found {}", json_kind(value));
            &[]
        }
    };
    items
        .iter()
        .enumerate()
        .filter_map(move |(index, item)| match item.as_object() {
            Some(object) => Some((index, object)),
            None => {
                warn!(kind, index, "skipping {kind} entry that is not an object");
                None
            }
        })
}

fn entry_name(index: usize, object: &Map<String, Value>, kind: &'static str) -> Option<String> {
    match object.get("name").and_then(Value::as_str).map(str::trim) {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => {
            warn!(kind, index, "skipping {kind} entry without a name");
            None
        }
    }
}

/// Scalars become their text form, `null` an empty string; nested values are dropped.
fn sample_values(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Null => Some(String::new()),
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(_) | Value::Object(_) => None,
        })
        .take(MAX_SAMPLE_VALUES)
        .collect()
}

fn warn_on_duplicates<'a>(kind: &'static str, names: impl IntoIterator<Item = &'a str>) {
    if let Err(error) = check_unique_names(kind, names) {
        warn!(%error, "input names are not unique; later duplicates may stay unmapped");
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn columns_infer_missing_types() {
        let columns = columns_from_json(&json!([
            {"name": "Place", "sample_values": [1, 2, 3, 4, 5]},
            {"name": "Swimmer", "inferred_type": "text"},
            {"name": "Club", "inferred_type": "bogus", "sample_values": ["Sharks", null]}
        ]));
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].inferred_type, ColumnType::Numeric);
        assert_eq!(columns[0].sample_values, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(columns[1].inferred_type, ColumnType::Text);
        assert_eq!(columns[2].sample_values, vec!["Sharks".to_string(), String::new()]);
    }

    #[test]
    fn non_array_root_is_empty() {
        assert!(columns_from_json(&json!({"name": "x"})).is_empty());
        assert!(fields_from_json(&json!(null)).is_empty());
    }

    #[test]
    fn bad_entries_are_skipped() {
        let fields = fields_from_json(&json!([
            "time",
            {"type": "numeric"},
            {"name": "  "},
            {"name": "place", "type": "integer", "category": "dimension"}
        ]));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "place");
        assert_eq!(fields[0].field_type, ColumnType::Integer);
        assert_eq!(fields[0].category, FieldCategory::Dimension);
    }

    #[test]
    fn relevance_defaults_to_name_score() {
        let fields = fields_from_json(&json!([
            {"name": "name"},
            {"name": "notes", "domain_relevance": 3}
        ]));
        assert_eq!(fields[0].domain_relevance, 10.0);
        assert_eq!(fields[1].domain_relevance, 3.0);
    }
}
