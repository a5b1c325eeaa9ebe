//! Type-safe enumerations shared by the mapping records.
//!
//! Collaborators exchange these as kebab-case strings (`"mixed-numeric"`,
//! `"domain-synonym"`); parsing also accepts underscores and spaces.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Data type of a source column or target field.
///
/// Source columns use the first seven variants. Target fields may also carry
/// the numeric and date-derived variants exposed by the host data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnType {
    Numeric,
    #[default]
    Text,
    /// Elapsed or clock time (`1:02.33`, `12:30`).
    Time,
    Date,
    /// Low-cardinality text.
    Categorical,
    /// Mostly numeric with stray text (`DNF`, `DQ`).
    MixedNumeric,
    /// No non-blank values were observed.
    Empty,
    Integer,
    Decimal,
    DateTime,
}

impl ColumnType {
    pub const ALL: [ColumnType; 10] = [
        ColumnType::Numeric,
        ColumnType::Text,
        ColumnType::Time,
        ColumnType::Date,
        ColumnType::Categorical,
        ColumnType::MixedNumeric,
        ColumnType::Empty,
        ColumnType::Integer,
        ColumnType::Decimal,
        ColumnType::DateTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Time => "time",
            ColumnType::Date => "date",
            ColumnType::Categorical => "categorical",
            ColumnType::MixedNumeric => "mixed-numeric",
            ColumnType::Empty => "empty",
            ColumnType::Integer => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_tag(s);
        match normalized.as_str() {
            "numeric" | "number" => Ok(ColumnType::Numeric),
            "text" | "string" => Ok(ColumnType::Text),
            "time" | "duration" => Ok(ColumnType::Time),
            "date" => Ok(ColumnType::Date),
            "categorical" => Ok(ColumnType::Categorical),
            "mixed-numeric" => Ok(ColumnType::MixedNumeric),
            "empty" => Ok(ColumnType::Empty),
            "integer" | "int" => Ok(ColumnType::Integer),
            "decimal" | "float" => Ok(ColumnType::Decimal),
            "datetime" | "timestamp" => Ok(ColumnType::DateTime),
            _ => Err(ModelError::UnknownColumnType(s.to_string())),
        }
    }
}

/// Role a target field plays in the host data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldCategory {
    Dimension,
    Measure,
    #[default]
    Uncategorized,
}

impl FieldCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::Dimension => "dimension",
            FieldCategory::Measure => "measure",
            FieldCategory::Uncategorized => "uncategorized",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_tag(s).as_str() {
            "dimension" => Ok(FieldCategory::Dimension),
            "measure" => Ok(FieldCategory::Measure),
            "uncategorized" | "" => Ok(FieldCategory::Uncategorized),
            _ => Err(ModelError::UnknownCategory(s.to_string())),
        }
    }
}

/// Heuristic that produced the winning confidence of a candidate.
///
/// Declaration order follows scorer precedence: on equal confidence the
/// earlier variant is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    /// No evidence at all.
    #[default]
    None,
    Exact,
    Contains,
    DomainSynonym,
    WordBoundary,
    FuzzyEditDistance,
    Phonetic,
    CharacterFrequency,
    LengthSimilarity,
    /// Coverage assignment made without heuristic support.
    Forced,
    /// Chosen by a user in an editing session.
    Manual,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::None => "none",
            MatchKind::Exact => "exact",
            MatchKind::Contains => "contains",
            MatchKind::DomainSynonym => "domain-synonym",
            MatchKind::WordBoundary => "word-boundary",
            MatchKind::FuzzyEditDistance => "fuzzy-edit-distance",
            MatchKind::Phonetic => "phonetic",
            MatchKind::CharacterFrequency => "character-frequency",
            MatchKind::LengthSimilarity => "length-similarity",
            MatchKind::Forced => "forced",
            MatchKind::Manual => "manual",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_tag(s).as_str() {
            "none" => Ok(MatchKind::None),
            "exact" => Ok(MatchKind::Exact),
            "contains" => Ok(MatchKind::Contains),
            "domain-synonym" => Ok(MatchKind::DomainSynonym),
            "word-boundary" => Ok(MatchKind::WordBoundary),
            "fuzzy-edit-distance" => Ok(MatchKind::FuzzyEditDistance),
            "phonetic" => Ok(MatchKind::Phonetic),
            "character-frequency" => Ok(MatchKind::CharacterFrequency),
            "length-similarity" => Ok(MatchKind::LengthSimilarity),
            "forced" => Ok(MatchKind::Forced),
            "manual" => Ok(MatchKind::Manual),
            _ => Err(ModelError::UnknownMatchKind(s.to_string())),
        }
    }
}

fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase().replace(['_', ' '], "-")
}
