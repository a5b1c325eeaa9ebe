//! Ranked candidate lists for one source column.

use std::cmp::Ordering;

use fieldmap_model::{MatchCandidate, SourceColumn, TargetField};

use crate::score::Scorer;

/// Scores `column` against every field and keeps the candidates above
/// `epsilon`, best first.
///
/// The sort is stable, so equal confidences keep the order of `fields`.
pub fn rank_candidates(
    scorer: &Scorer,
    column: &SourceColumn,
    fields: &[TargetField],
    epsilon: f64,
) -> Vec<MatchCandidate> {
    let mut candidates: Vec<MatchCandidate> = fields
        .iter()
        .map(|field| scorer.score(column, field))
        .filter(|candidate| candidate.confidence > epsilon)
        .collect();
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_model::{ColumnType, MatchKind};

    fn fields(names: &[&str]) -> Vec<TargetField> {
        names
            .iter()
            .map(|n| TargetField::new(*n, ColumnType::Text))
            .collect()
    }

    #[test]
    fn best_candidate_first() {
        let column = SourceColumn::new("finish_time", ColumnType::Text);
        let ranked = rank_candidates(
            &Scorer::default(),
            &column,
            &fields(&["name", "time", "finish_time"]),
            0.01,
        );
        assert_eq!(ranked[0].target_name(), "finish_time");
        assert_eq!(ranked[0].kind, MatchKind::Exact);
        assert!(
            ranked
                .windows(2)
                .all(|w| w[0].confidence >= w[1].confidence)
        );
    }

    #[test]
    fn ties_keep_field_order() {
        let column = SourceColumn::new("Time", ColumnType::Text);
        let ranked = rank_candidates(
            &Scorer::default(),
            &column,
            &fields(&["TIME", "time"]),
            0.01,
        );
        let names: Vec<_> = ranked.iter().map(|c| c.target_name()).collect();
        assert_eq!(names, vec!["TIME", "time"]);
    }

    #[test]
    fn epsilon_drops_noise() {
        let column = SourceColumn::new("xyz123", ColumnType::Text);
        let ranked = rank_candidates(&Scorer::default(), &column, &fields(&["qrs789"]), 0.01);
        assert!(ranked.is_empty());
    }
}
