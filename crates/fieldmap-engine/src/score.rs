//! Cascading heuristic scoring for one (source column, target field) pair.
//!
//! Strategies run from most to least specific and the strongest one wins:
//!
//! 1. exact case-insensitive name equality
//! 2. substring containment
//! 3. domain synonym table
//! 4. word-boundary token overlap
//! 5. Levenshtein similarity
//! 6. sound-alike signatures
//! 7. character-frequency and length-ratio tie-breakers
//!
//! The winner is then scaled by type compatibility and boosted by the
//! field's domain relevance. Exact hits skip both adjustments. On equal
//! confidence the earlier strategy is reported.

use std::collections::BTreeSet;

use fieldmap_model::{MatchCandidate, MatchKind, SourceColumn, TargetField};
use serde::Serialize;

use crate::config::ScoreWeights;
use crate::heuristics::{
    edit_similarity, histogram_similarity, length_ratio, phonetic_signature, type_compatibility,
};
use crate::patterns::{DOMAIN_CONCEPTS, TermHit, is_domain_term};
use crate::utils::{compact, names_equal, normalize_text, tokens};

/// Score for a single column-field pair, with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnScore {
    /// Final confidence, clamped to `[0, 1]`.
    pub confidence: f64,
    /// Strategy that produced the winning evidence.
    pub kind: MatchKind,
    pub rationale: String,
    /// Every strategy that fired plus the adjustments, in evaluation order.
    pub explanation: Vec<ScoreComponent>,
}

impl ColumnScore {
    fn none(rationale: impl Into<String>) -> Self {
        Self {
            confidence: 0.0,
            kind: MatchKind::None,
            rationale: rationale.into(),
            explanation: Vec::new(),
        }
    }

    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.explanation
            .iter()
            .map(|c| format!("{}: {:.0}%", c.name, c.value * 100.0))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A component contributing to the final score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    /// Component name (e.g., "Containment").
    pub name: &'static str,
    /// Strategy tag for evidence components, `None` for adjustments.
    pub kind: Option<MatchKind>,
    /// Confidence for evidence, multiplier for adjustments.
    pub value: f64,
    pub description: String,
}

impl ScoreComponent {
    fn evidence(name: &'static str, kind: MatchKind, value: f64, description: String) -> Self {
        Self {
            name,
            kind: Some(kind),
            value,
            description,
        }
    }

    fn adjustment(name: &'static str, value: f64, description: String) -> Self {
        Self {
            name,
            kind: None,
            value,
            description,
        }
    }
}

/// Precomputed forms of both names.
struct NamePair<'a> {
    column: &'a str,
    field: &'a str,
    column_normalized: String,
    field_normalized: String,
    column_compact: String,
    field_compact: String,
}

impl<'a> NamePair<'a> {
    fn new(column: &'a str, field: &'a str) -> Self {
        Self {
            column,
            field,
            column_normalized: normalize_text(column),
            field_normalized: normalize_text(field),
            column_compact: compact(column),
            field_compact: compact(field),
        }
    }
}

/// The single source of match confidence.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Scores one pair. Never fails; empty names score 0 with kind `none`.
    pub fn score(&self, column: &SourceColumn, field: &TargetField) -> MatchCandidate {
        let detail = self.score_detailed(column, field);
        MatchCandidate {
            source_column: column.name.clone(),
            target_field: field.clone(),
            confidence: detail.confidence,
            kind: detail.kind,
            rationale: detail.rationale,
        }
    }

    /// Scores one pair and keeps the per-strategy breakdown.
    pub fn score_detailed(&self, column: &SourceColumn, field: &TargetField) -> ColumnScore {
        let w = &self.weights;
        let column_name = column.name.trim();
        let field_name = field.name.trim();
        if column_name.is_empty() || field_name.is_empty() {
            return ColumnScore::none("empty name");
        }

        if names_equal(column_name, field_name) {
            let description = format!("exact name match '{column_name}' = '{field_name}'");
            return ColumnScore {
                confidence: w.exact.clamp(0.0, 1.0),
                kind: MatchKind::Exact,
                rationale: description.clone(),
                explanation: vec![ScoreComponent::evidence(
                    "Exact name",
                    MatchKind::Exact,
                    w.exact,
                    description,
                )],
            };
        }

        let pair = NamePair::new(column_name, field_name);
        let mut explanation: Vec<ScoreComponent> = [
            self.containment(&pair),
            self.domain_synonym(&pair),
            self.word_boundary(&pair),
            self.fuzzy(&pair),
            self.phonetic(&pair),
        ]
        .into_iter()
        .flatten()
        .collect();
        explanation.extend(self.tie_breakers(&pair));

        // Strict comparison keeps the earlier strategy on ties.
        let mut best: Option<&ScoreComponent> = None;
        for component in &explanation {
            if best.is_none_or(|b| component.value > b.value) {
                best = Some(component);
            }
        }
        let Some(best) = best.filter(|b| b.value > 0.0) else {
            return ColumnScore::none(format!(
                "no name evidence linking '{column_name}' and '{field_name}'"
            ));
        };
        let kind = best.kind.unwrap_or(MatchKind::None);
        let mut confidence = best.value;
        let mut rationale = best.description.clone();

        let factor = type_compatibility(
            column.inferred_type,
            field.field_type,
            w.type_mismatch_floor,
        );
        if factor < 1.0 {
            confidence *= factor;
            rationale.push_str(&format!(
                "; type {} -> {} x{factor:.2}",
                column.inferred_type, field.field_type
            ));
            explanation.push(ScoreComponent::adjustment(
                "Type compatibility",
                factor,
                format!("{} column into {} field", column.inferred_type, field.field_type),
            ));
        }

        let relevance = field.domain_relevance.clamp(0.0, 10.0);
        if relevance > w.relevance_threshold {
            let boost = w.relevance_max_boost * (relevance - w.relevance_threshold)
                / (10.0 - w.relevance_threshold);
            confidence *= 1.0 + boost;
            rationale.push_str(&format!(
                "; domain relevance {relevance:.0} +{:.0}%",
                boost * 100.0
            ));
            explanation.push(ScoreComponent::adjustment(
                "Domain relevance",
                1.0 + boost,
                format!("field relevance {relevance:.1} of 10"),
            ));
        }

        if confidence > w.inexact_cap {
            explanation.push(ScoreComponent::adjustment(
                "Inexact cap",
                w.inexact_cap / confidence,
                format!("non-exact matches stop at {:.2}", w.inexact_cap),
            ));
        }

        ColumnScore {
            confidence: confidence.min(w.inexact_cap).max(0.0),
            kind,
            rationale,
            explanation,
        }
    }

    fn containment(&self, pair: &NamePair<'_>) -> Option<ScoreComponent> {
        let w = &self.weights;
        let (a, b) = (&pair.column_compact, &pair.field_compact);
        let (inner, outer, inner_name, outer_name) = if a.chars().count() <= b.chars().count() {
            (a, b, pair.column, pair.field)
        } else {
            (b, a, pair.field, pair.column)
        };
        let inner_len = inner.chars().count();
        if inner_len < w.contains_min_len || !outer.contains(inner.as_str()) {
            return None;
        }
        let ratio = inner_len as f64 / outer.chars().count() as f64;
        let domain_term = is_domain_term(&normalize_text(inner_name));
        let mut value = w.contains_base + w.contains_span * ratio;
        let mut description = if inner == outer {
            format!("'{}' and '{}' differ only in separators", pair.column, pair.field)
        } else {
            format!("'{outer_name}' contains '{inner_name}'")
        };
        if domain_term {
            value += w.contains_domain_bonus;
            description.push_str(" (domain term)");
        }
        Some(ScoreComponent::evidence(
            "Containment",
            MatchKind::Contains,
            value,
            description,
        ))
    }

    fn domain_synonym(&self, pair: &NamePair<'_>) -> Option<ScoreComponent> {
        let w = &self.weights;
        let mut best: Option<ScoreComponent> = None;
        for concept in DOMAIN_CONCEPTS {
            let (Some(column_hit), Some(field_hit)) = (
                concept.hit(&pair.column_normalized),
                concept.hit(&pair.field_normalized),
            ) else {
                continue;
            };
            let exact_hits = (column_hit != TermHit::Mentions, field_hit != TermHit::Mentions);
            let (value, description) = match exact_hits {
                (true, true) => {
                    let value = if column_hit == TermHit::Canonical
                        || field_hit == TermHit::Canonical
                    {
                        w.synonym_canonical
                    } else {
                        w.synonym_exact
                    };
                    (
                        value,
                        format!(
                            "'{}' and '{}' are both '{}' terms",
                            pair.column, pair.field, concept.canonical
                        ),
                    )
                }
                (true, false) | (false, true) => {
                    let (exact, loose, loose_normalized) = if exact_hits.0 {
                        (pair.column, pair.field, &pair.field_normalized)
                    } else {
                        (pair.field, pair.column, &pair.column_normalized)
                    };
                    let term = concept.mentioned_term(loose_normalized).unwrap_or(concept.canonical);
                    (
                        w.synonym_partial,
                        format!(
                            "'{exact}' is a '{}' term and '{loose}' mentions '{term}'",
                            concept.canonical
                        ),
                    )
                }
                (false, false) => (
                    w.synonym_inclusion,
                    format!(
                        "'{}' and '{}' both mention '{}' terms",
                        pair.column, pair.field, concept.canonical
                    ),
                ),
            };
            if best.as_ref().is_none_or(|b| value > b.value) {
                best = Some(ScoreComponent::evidence(
                    "Domain synonym",
                    MatchKind::DomainSynonym,
                    value,
                    description,
                ));
            }
        }
        best
    }

    fn word_boundary(&self, pair: &NamePair<'_>) -> Option<ScoreComponent> {
        let w = &self.weights;
        let left: BTreeSet<String> = tokens(pair.column).into_iter().collect();
        let right: BTreeSet<String> = tokens(pair.field).into_iter().collect();
        if left.is_empty() || right.is_empty() {
            return None;
        }

        let shared: Vec<&String> = left.intersection(&right).collect();
        let union = left.union(&right).count();
        let overlap = if shared.is_empty() {
            None
        } else if left == right {
            Some((w.word_exact, "identical tokens".to_string()))
        } else {
            let jaccard = shared.len() as f64 / union as f64;
            Some((
                w.word_partial + (w.word_exact - w.word_partial) * jaccard,
                format!(
                    "shared tokens [{}] ({} of {union})",
                    shared
                        .iter()
                        .map(|t| t.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    shared.len()
                ),
            ))
        };

        let prefix = left.iter().find_map(|a| {
            right.iter().find_map(|b| {
                let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
                (short != long && short.chars().count() >= 3 && long.starts_with(short.as_str()))
                    .then(|| (w.word_prefix, format!("token '{short}' abbreviates '{long}'")))
            })
        });

        let (value, description) = match (overlap, prefix) {
            (Some(o), Some(p)) => {
                if p.0 > o.0 {
                    p
                } else {
                    o
                }
            }
            (Some(o), None) => o,
            (None, Some(p)) => p,
            (None, None) => return None,
        };
        Some(ScoreComponent::evidence(
            "Word boundary",
            MatchKind::WordBoundary,
            value,
            description,
        ))
    }

    fn fuzzy(&self, pair: &NamePair<'_>) -> Option<ScoreComponent> {
        let w = &self.weights;
        let (similarity, distance) = edit_similarity(&pair.column_compact, &pair.field_compact);
        if similarity <= w.fuzzy_min_similarity {
            return None;
        }
        Some(ScoreComponent::evidence(
            "Edit distance",
            MatchKind::FuzzyEditDistance,
            similarity * w.fuzzy_weight,
            format!(
                "edit similarity {similarity:.2} ({distance} edit{})",
                if distance == 1 { "" } else { "s" }
            ),
        ))
    }

    fn phonetic(&self, pair: &NamePair<'_>) -> Option<ScoreComponent> {
        let w = &self.weights;
        let left = phonetic_signature(&pair.column_compact);
        let right = phonetic_signature(&pair.field_compact);
        if left.len() > 2 && left == right {
            return Some(ScoreComponent::evidence(
                "Phonetic",
                MatchKind::Phonetic,
                w.phonetic_exact,
                format!("sound-alike signatures '{left}' match"),
            ));
        }
        if left.len() >= 2 && right.len() >= 2 && left[..2] == right[..2] {
            return Some(ScoreComponent::evidence(
                "Phonetic",
                MatchKind::Phonetic,
                w.phonetic_prefix,
                format!("sound-alike signatures '{left}' and '{right}' share a prefix"),
            ));
        }
        None
    }

    /// Character-frequency and length-ratio similarity, both gated on a
    /// minimum character overlap. The length signal is weighted by that overlap.
    fn tie_breakers(&self, pair: &NamePair<'_>) -> Vec<ScoreComponent> {
        let w = &self.weights;
        let overlap = histogram_similarity(&pair.column_compact, &pair.field_compact);
        if overlap < w.histogram_min_similarity {
            return Vec::new();
        }
        let ratio = length_ratio(&pair.column_compact, &pair.field_compact);
        vec![
            ScoreComponent::evidence(
                "Character frequency",
                MatchKind::CharacterFrequency,
                overlap * w.histogram_cap,
                format!("character overlap {overlap:.2}"),
            ),
            ScoreComponent::evidence(
                "Length similarity",
                MatchKind::LengthSimilarity,
                ratio * overlap * w.length_cap,
                format!("length ratio {ratio:.2} with character overlap {overlap:.2}"),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_model::ColumnType;
    use crate::patterns::domain_relevance;

    fn text_column(name: &str) -> SourceColumn {
        SourceColumn::new(name, ColumnType::Text)
    }

    fn text_field(name: &str) -> TargetField {
        TargetField::new(name, ColumnType::Text)
    }

    fn score(column: &str, field: &str) -> MatchCandidate {
        Scorer::default().score(&text_column(column), &text_field(field))
    }

    #[test]
    fn exact_match_is_authoritative() {
        let scorer = Scorer::default();
        let column = SourceColumn::new("Time", ColumnType::Text);
        let field = TargetField::new("time", ColumnType::Numeric).with_relevance(10.0);
        let candidate = scorer.score(&column, &field);
        assert_eq!(candidate.confidence, 1.0);
        assert_eq!(candidate.kind, MatchKind::Exact);
    }

    #[test]
    fn empty_names_score_zero() {
        let candidate = score("  ", "name");
        assert_eq!(candidate.confidence, 0.0);
        assert_eq!(candidate.kind, MatchKind::None);
    }

    #[test]
    fn containment_band() {
        let candidate = score("swim_time_total", "time");
        assert_eq!(candidate.kind, MatchKind::Contains);
        assert!(candidate.confidence >= 0.8 && candidate.confidence <= 0.95);
        assert!(candidate.rationale.contains("domain term"));
    }

    #[test]
    fn separator_variants_score_as_containment() {
        let candidate = score("Finish_Time", "FinishTime");
        assert_eq!(candidate.kind, MatchKind::Contains);
        assert!((candidate.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn synonym_pair_beats_weaker_strategies() {
        let candidate = score("Swimmer", "Name");
        assert_eq!(candidate.kind, MatchKind::DomainSynonym);
        assert!((candidate.confidence - 0.95).abs() < 1e-9);

        let candidate = score("Rank", "Position");
        assert_eq!(candidate.kind, MatchKind::DomainSynonym);
        assert!((candidate.confidence - 0.90).abs() < 1e-9);
    }

    #[test]
    fn token_prefix_is_word_boundary_evidence() {
        let scorer = Scorer::default();
        let detail = scorer.score_detailed(&text_column("lane_pos"), &text_field("lane_position"));
        assert!(
            detail
                .explanation
                .iter()
                .any(|c| c.kind == Some(MatchKind::WordBoundary))
        );
    }

    #[test]
    fn fuzzy_match_on_typos() {
        let candidate = score("plcae", "place");
        assert!(candidate.confidence > 0.5, "got {candidate:?}");
    }

    #[test]
    fn unrelated_names_have_no_evidence() {
        let candidate = score("xyz123", "qrs789");
        assert_eq!(candidate.confidence, 0.0);
        assert_eq!(candidate.kind, MatchKind::None);
    }

    #[test]
    fn type_mismatch_scales_confidence() {
        let scorer = Scorer::default();
        let column = SourceColumn::new("athlete_name", ColumnType::Text);
        let same = scorer.score(&column, &TargetField::new("name", ColumnType::Text));
        let mismatched = scorer.score(&column, &TargetField::new("name", ColumnType::Numeric));
        assert!(mismatched.confidence < same.confidence);
        assert!(mismatched.confidence > 0.0);
        assert!(mismatched.rationale.contains("type text -> numeric"));
    }

    #[test]
    fn relevance_boost_is_bounded() {
        let scorer = Scorer::default();
        let column = SourceColumn::new("lap_time", ColumnType::Text);
        let plain = scorer.score(&column, &TargetField::new("laptimes", ColumnType::Text));
        let boosted = scorer.score(
            &column,
            &TargetField::new("laptimes", ColumnType::Text).with_relevance(10.0),
        );
        assert!(boosted.confidence > plain.confidence);
        assert!(boosted.confidence <= (plain.confidence * 1.1).min(1.0) + 1e-9);
    }

    #[test]
    fn relevant_fields_keep_non_exact_below_exact() {
        let scorer = Scorer::default();
        let field = text_field("name").with_relevance(domain_relevance("name"));
        let detail = scorer.score_detailed(&text_column("athlete_name"), &field);
        assert_ne!(detail.kind, MatchKind::Exact);
        assert!(detail.confidence <= 0.95, "got {}", detail.confidence);

        let detail = scorer.score_detailed(&text_column("Swimmer"), &field);
        assert_eq!(detail.kind, MatchKind::DomainSynonym);
        assert_eq!(detail.confidence, 0.95);
        assert!(detail.explanation.iter().any(|c| c.name == "Inexact cap"));
    }

    #[test]
    fn explanation_lists_every_strategy() {
        let scorer = Scorer::default();
        let detail = scorer.score_detailed(&text_column("lap_time"), &text_field("time"));
        let explanation = detail.explain();
        assert!(explanation.contains("Containment"));
        assert!(explanation.contains("Word boundary"));
        assert!(explanation.contains("Domain synonym"));
    }
}
