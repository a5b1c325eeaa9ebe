//! Input records handed in by the parsing and schema-introspection collaborators.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::enums::{ColumnType, FieldCategory};
use crate::error::{ModelError, Result};

/// Upper bound on the sample preview kept per column.
pub const MAX_SAMPLE_VALUES: usize = 20;

/// A column extracted from an uploaded tabular file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceColumn {
    pub name: String,
    pub inferred_type: ColumnType,
    /// Raw preview values in file order, at most [`MAX_SAMPLE_VALUES`].
    #[serde(default)]
    pub sample_values: Vec<String>,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, inferred_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            inferred_type,
            sample_values: Vec::new(),
        }
    }

    /// Builds a column whose type is inferred from the sample preview.
    pub fn from_samples(name: impl Into<String>, samples: Vec<String>) -> Self {
        let mut sample_values = samples;
        sample_values.truncate(MAX_SAMPLE_VALUES);
        let inferred_type = ColumnType::infer(&sample_values);
        Self {
            name: name.into(),
            inferred_type,
            sample_values,
        }
    }

    #[must_use]
    pub fn with_samples(mut self, samples: Vec<String>) -> Self {
        self.sample_values = samples;
        self.sample_values.truncate(MAX_SAMPLE_VALUES);
        self
    }
}

/// A field of the destination data model that can receive a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetField {
    pub name: String,
    #[serde(default)]
    pub category: FieldCategory,
    #[serde(rename = "type", default)]
    pub field_type: ColumnType,
    /// Name-pattern relevance to the domain vocabulary, 0 to 10.
    #[serde(default)]
    pub domain_relevance: f64,
}

impl TargetField {
    pub fn new(name: impl Into<String>, field_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            category: FieldCategory::Uncategorized,
            field_type,
            domain_relevance: 0.0,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: FieldCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.domain_relevance = relevance.clamp(0.0, 10.0);
        self
    }
}

/// Verifies that names are non-empty and unique (case-insensitive).
///
/// The engine itself tolerates violations; collaborators call this to report
/// them before a run.
pub fn check_unique_names<'a>(
    kind: &'static str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyName { kind });
        }
        if !seen.insert(trimmed.to_lowercase()) {
            return Err(ModelError::DuplicateName {
                kind,
                name: trimmed.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_case_insensitive() {
        let err = check_unique_names("column", ["Time", "place", "TIME"]).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateName {
                kind: "column",
                name: "TIME".to_string()
            }
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        let err = check_unique_names("field", ["name", "  "]).unwrap_err();
        assert_eq!(err, ModelError::EmptyName { kind: "field" });
    }

    #[test]
    fn target_field_deserializes_with_defaults() {
        let field: TargetField = serde_json::from_str(r#"{"name": "Swimmer"}"#).unwrap();
        assert_eq!(field.category, FieldCategory::Uncategorized);
        assert_eq!(field.field_type, ColumnType::Text);
        assert_eq!(field.domain_relevance, 0.0);
    }

    #[test]
    fn sample_preview_is_bounded() {
        let samples = (0..50).map(|i| i.to_string()).collect();
        let column = SourceColumn::from_samples("lane", samples);
        assert_eq!(column.sample_values.len(), MAX_SAMPLE_VALUES);
        assert_eq!(column.inferred_type, ColumnType::Numeric);
    }
}
