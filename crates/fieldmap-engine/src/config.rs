//! Tunable weights and thresholds for a mapping run.
//!
//! Every numeric constant the scorer, the phases and the resolver use lives
//! here, so a single [`EngineConfig`] fully describes how confidences are
//! produced. Configs load from TOML; omitted keys keep their defaults.
//!
//! ```toml
//! candidate_epsilon = 0.01
//!
//! [phases]
//! precision = 0.6
//!
//! [weights]
//! relevance_max_boost = 0.05
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Weight table for the scoring cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Case-insensitive name equality.
    pub exact: f64,
    /// Lower edge of the containment band.
    pub contains_base: f64,
    /// Added to `contains_base` in proportion to the length ratio of the names.
    pub contains_span: f64,
    /// Extra credit when the contained text is a domain term.
    pub contains_domain_bonus: f64,
    /// Shortest name allowed to count as contained in another.
    pub contains_min_len: usize,
    /// Both names are terms of one concept and one is the canonical term.
    pub synonym_canonical: f64,
    /// Both names are (non-canonical) terms of one concept.
    pub synonym_exact: f64,
    /// One name is a term, the other mentions a term of the same concept.
    pub synonym_partial: f64,
    /// Both names merely mention terms of the same concept.
    pub synonym_inclusion: f64,
    /// Identical token sets.
    pub word_exact: f64,
    /// Floor of the token-overlap band; scales up to `word_exact` with Jaccard overlap.
    pub word_partial: f64,
    /// One token abbreviates another (`pos` / `position`).
    pub word_prefix: f64,
    /// Edit similarity at or below this contributes nothing.
    pub fuzzy_min_similarity: f64,
    /// Multiplier applied to the edit similarity.
    pub fuzzy_weight: f64,
    /// Identical sound-alike signatures longer than two codes.
    pub phonetic_exact: f64,
    /// Sound-alike signatures sharing their first two codes.
    pub phonetic_prefix: f64,
    /// Cap for character-frequency similarity.
    pub histogram_cap: f64,
    /// Character overlap below this gates both tie-breakers off.
    pub histogram_min_similarity: f64,
    /// Cap for length-ratio similarity.
    pub length_cap: f64,
    /// Multiplier for type pairs with no known compatibility.
    pub type_mismatch_floor: f64,
    /// Relevance (0-10) above which a field earns a boost.
    pub relevance_threshold: f64,
    /// Boost reached at relevance 10.
    pub relevance_max_boost: f64,
    /// Ceiling for every non-exact score after type and relevance adjustments.
    pub inexact_cap: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            exact: 1.0,
            contains_base: 0.80,
            contains_span: 0.10,
            contains_domain_bonus: 0.05,
            contains_min_len: 3,
            synonym_canonical: 0.95,
            synonym_exact: 0.90,
            synonym_partial: 0.80,
            synonym_inclusion: 0.70,
            word_exact: 0.80,
            word_partial: 0.40,
            word_prefix: 0.45,
            fuzzy_min_similarity: 0.5,
            fuzzy_weight: 0.9,
            phonetic_exact: 0.70,
            phonetic_prefix: 0.50,
            histogram_cap: 0.55,
            histogram_min_similarity: 0.5,
            length_cap: 0.60,
            type_mismatch_floor: 0.6,
            relevance_threshold: 5.0,
            relevance_max_boost: 0.10,
            inexact_cap: 0.95,
        }
    }
}

/// Acceptance thresholds and floors of the three assignment passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    /// Precision pass commits candidates strictly above this.
    pub precision: f64,
    /// Recall pass commits candidates strictly above this.
    pub recall: f64,
    /// Display minimum for recall-pass commits.
    pub recall_floor: f64,
    /// Confidence of a forced assignment without supporting evidence.
    pub forced_floor: f64,
    /// Confidence carried by a column left unmapped because no fields remained.
    pub exhausted_placeholder: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            precision: 0.5,
            recall: 0.2,
            recall_floor: 0.3,
            forced_floor: 0.1,
            exhausted_placeholder: 0.01,
        }
    }
}

/// Confidence adjustments applied by the conflict resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverPenalties {
    pub reassignment_penalty: f64,
    pub reassignment_floor: f64,
    pub unresolved_penalty: f64,
    pub unresolved_floor: f64,
}

impl Default for ResolverPenalties {
    fn default() -> Self {
        Self {
            reassignment_penalty: 0.85,
            reassignment_floor: 0.15,
            unresolved_penalty: 0.5,
            unresolved_floor: 0.05,
        }
    }
}

/// Confidence level categories for mapping quality assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfidenceLevel {
    /// Below the medium threshold; needs manual confirmation.
    Low,
    /// Reasonable but should be reviewed.
    Medium,
    /// Near-certain.
    High,
}

impl ConfidenceLevel {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }
}

/// Bucket boundaries used by the summary.
///
/// - at or above `high`: [`ConfidenceLevel::High`]
/// - at or above `medium`: [`ConfidenceLevel::Medium`]
/// - everything else: [`ConfidenceLevel::Low`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.8,
            medium: 0.5,
        }
    }
}

impl ConfidenceThresholds {
    #[must_use]
    pub fn categorize(&self, confidence: f64) -> ConfidenceLevel {
        if confidence >= self.high {
            ConfidenceLevel::High
        } else if confidence >= self.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Complete configuration of a mapping run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: ScoreWeights,
    pub phases: PhaseThresholds,
    pub resolver: ResolverPenalties,
    pub confidence: ConfidenceThresholds,
    /// Candidates at or below this are treated as "no evidence".
    pub candidate_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            phases: PhaseThresholds::default(),
            resolver: ResolverPenalties::default(),
            confidence: ConfidenceThresholds::default(),
            candidate_epsilon: 0.01,
        }
    }
}

impl EngineConfig {
    /// Fewer, surer mappings: higher pass thresholds, fewer recall admissions.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            phases: PhaseThresholds {
                precision: 0.7,
                recall: 0.4,
                recall_floor: 0.45,
                ..PhaseThresholds::default()
            },
            confidence: ConfidenceThresholds {
                high: 0.9,
                medium: 0.7,
            },
            ..Self::default()
        }
    }

    /// Exploratory mapping: lower pass thresholds.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            phases: PhaseThresholds {
                precision: 0.4,
                recall: 0.1,
                recall_floor: 0.25,
                ..PhaseThresholds::default()
            },
            confidence: ConfidenceThresholds {
                high: 0.7,
                medium: 0.4,
            },
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Toml {
            path: origin.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&contents, path)
    }

    /// Checks ranges and cross-field ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        for (name, value) in [
            ("weights.exact", w.exact),
            ("weights.contains_base", w.contains_base),
            ("weights.contains_span", w.contains_span),
            ("weights.contains_domain_bonus", w.contains_domain_bonus),
            ("weights.synonym_canonical", w.synonym_canonical),
            ("weights.synonym_exact", w.synonym_exact),
            ("weights.synonym_partial", w.synonym_partial),
            ("weights.synonym_inclusion", w.synonym_inclusion),
            ("weights.word_exact", w.word_exact),
            ("weights.word_partial", w.word_partial),
            ("weights.word_prefix", w.word_prefix),
            ("weights.fuzzy_min_similarity", w.fuzzy_min_similarity),
            ("weights.fuzzy_weight", w.fuzzy_weight),
            ("weights.phonetic_exact", w.phonetic_exact),
            ("weights.phonetic_prefix", w.phonetic_prefix),
            ("weights.histogram_cap", w.histogram_cap),
            ("weights.histogram_min_similarity", w.histogram_min_similarity),
            ("weights.length_cap", w.length_cap),
            ("weights.inexact_cap", w.inexact_cap),
            ("phases.precision", self.phases.precision),
            ("phases.recall", self.phases.recall),
            ("phases.recall_floor", self.phases.recall_floor),
            ("phases.forced_floor", self.phases.forced_floor),
            ("phases.exhausted_placeholder", self.phases.exhausted_placeholder),
            ("resolver.reassignment_penalty", self.resolver.reassignment_penalty),
            ("resolver.reassignment_floor", self.resolver.reassignment_floor),
            ("resolver.unresolved_penalty", self.resolver.unresolved_penalty),
            ("resolver.unresolved_floor", self.resolver.unresolved_floor),
            ("confidence.high", self.confidence.high),
            ("confidence.medium", self.confidence.medium),
            ("candidate_epsilon", self.candidate_epsilon),
        ] {
            check_range(name, value, 0.0, 1.0)?;
        }
        // A zero multiplier would reject type pairs outright.
        check_range("weights.type_mismatch_floor", w.type_mismatch_floor, 0.01, 1.0)?;
        check_range("weights.relevance_threshold", w.relevance_threshold, 0.0, 9.99)?;
        check_range("weights.relevance_max_boost", w.relevance_max_boost, 0.0, 0.10)?;

        if self.phases.recall > self.phases.precision {
            return Err(ConfigError::Inconsistent(format!(
                "phases.recall ({}) exceeds phases.precision ({})",
                self.phases.recall, self.phases.precision
            )));
        }
        if self.confidence.medium > self.confidence.high {
            return Err(ConfigError::Inconsistent(format!(
                "confidence.medium ({}) exceeds confidence.high ({})",
                self.confidence.medium, self.confidence.high
            )));
        }
        if w.inexact_cap >= w.exact {
            return Err(ConfigError::Inconsistent(format!(
                "weights.inexact_cap ({}) must stay below weights.exact ({})",
                w.inexact_cap, w.exact
            )));
        }
        if w.contains_base + w.contains_span + w.contains_domain_bonus > 1.0 {
            return Err(ConfigError::Inconsistent(
                "containment band exceeds 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_presets_validate() {
        EngineConfig::default().validate().unwrap();
        EngineConfig::strict().validate().unwrap();
        EngineConfig::relaxed().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            "candidate_epsilon = 0.02\n[phases]\nprecision = 0.6\n",
            Path::new("inline.toml"),
        )
        .unwrap();
        assert_eq!(config.candidate_epsilon, 0.02);
        assert_eq!(config.phases.precision, 0.6);
        assert_eq!(config.phases.recall, PhaseThresholds::default().recall);
        assert_eq!(config.weights, ScoreWeights::default());
    }

    #[test]
    fn rejects_oversized_relevance_boost() {
        let err = EngineConfig::from_toml_str(
            "[weights]\nrelevance_max_boost = 0.25\n",
            Path::new("inline.toml"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "weights.relevance_max_boost",
                ..
            }
        ));
    }

    #[test]
    fn rejects_recall_above_precision() {
        let mut config = EngineConfig::default();
        config.phases.recall = 0.7;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Inconsistent(_))
        ));
    }

    #[test]
    fn categorize_uses_inclusive_lower_bounds() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.categorize(0.8), ConfidenceLevel::High);
        assert_eq!(thresholds.categorize(0.5), ConfidenceLevel::Medium);
        assert_eq!(thresholds.categorize(0.49), ConfidenceLevel::Low);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
