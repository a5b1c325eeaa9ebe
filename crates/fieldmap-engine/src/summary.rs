//! Coverage and confidence statistics.

use std::collections::BTreeMap;

use fieldmap_model::{AssignmentSet, SummaryStats};

use crate::config::{ConfidenceLevel, ConfidenceThresholds};

/// Aggregates an assignment set. Buckets and the mean cover mapped entries only.
pub fn summarize(set: &AssignmentSet, thresholds: &ConfidenceThresholds) -> SummaryStats {
    let mut stats = SummaryStats {
        total_columns: set.len(),
        ..SummaryStats::default()
    };
    let mut total_confidence = 0.0;

    for entry in set {
        if entry.is_unresolved() {
            stats.unresolved_conflicts += 1;
        }
        if !entry.is_mapped() {
            continue;
        }
        stats.mapped += 1;
        total_confidence += entry.confidence;
        if entry.is_forced() {
            stats.forced += 1;
        }
        match thresholds.categorize(entry.confidence) {
            ConfidenceLevel::High => stats.high_confidence += 1,
            ConfidenceLevel::Medium => stats.medium_confidence += 1,
            ConfidenceLevel::Low => stats.low_confidence += 1,
        }
    }

    stats.unmapped = stats.total_columns - stats.mapped;
    if stats.mapped > 0 {
        stats.mean_confidence = total_confidence / stats.mapped as f64;
    }
    stats
}

/// Mapped entries per confidence level.
pub fn count_by_level(
    set: &AssignmentSet,
    thresholds: &ConfidenceThresholds,
) -> BTreeMap<ConfidenceLevel, usize> {
    let mut counts = BTreeMap::new();
    for entry in set.mapped() {
        *counts.entry(thresholds.categorize(entry.confidence)).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_model::{
        Assignment, AssignmentPhase, ColumnType, ConflictState, MatchCandidate, MatchKind,
        TargetField,
    };

    fn entry(column: &str, field: Option<&str>, confidence: f64, phase: AssignmentPhase) -> Assignment {
        let mut entry = Assignment::unassigned(column);
        if let Some(field) = field {
            entry.commit(
                MatchCandidate {
                    source_column: column.to_string(),
                    target_field: TargetField::new(field, ColumnType::Text),
                    confidence,
                    kind: MatchKind::Contains,
                    rationale: String::new(),
                },
                phase,
            );
        }
        entry
    }

    #[test]
    fn empty_set_is_all_zero() {
        let stats = summarize(&AssignmentSet::default(), &ConfidenceThresholds::default());
        assert_eq!(stats, SummaryStats::default());
    }

    #[test]
    fn buckets_cover_mapped_entries_only() {
        let mut unresolved = entry("d", Some("x"), 0.3, AssignmentPhase::Recall);
        unresolved.conflict = ConflictState::Unresolved;
        let set = AssignmentSet::new(vec![
            entry("a", Some("x"), 0.9, AssignmentPhase::Precision),
            entry("b", Some("y"), 0.6, AssignmentPhase::Precision),
            entry("c", Some("z"), 0.1, AssignmentPhase::Forced),
            unresolved,
            entry("e", None, 0.0, AssignmentPhase::Forced),
        ]);
        let stats = summarize(&set, &ConfidenceThresholds::default());
        assert_eq!(stats.total_columns, 5);
        assert_eq!(stats.mapped, 3);
        assert_eq!(stats.unmapped, 2);
        assert_eq!(
            (stats.high_confidence, stats.medium_confidence, stats.low_confidence),
            (1, 1, 1)
        );
        assert_eq!(stats.forced, 1);
        assert_eq!(stats.unresolved_conflicts, 1);
        assert!((stats.mean_confidence - (0.9 + 0.6 + 0.1) / 3.0).abs() < 1e-9);

        let levels = count_by_level(&set, &ConfidenceThresholds::default());
        assert_eq!(levels.get(&ConfidenceLevel::High), Some(&1));
        assert_eq!(levels.values().sum::<usize>(), 3);
    }
}
