pub mod assignment;
pub mod column;
pub mod enums;
pub mod error;
mod infer;
pub mod summary;

pub use assignment::{
    Assignment, AssignmentPhase, AssignmentSet, AssignmentState, ConflictState, MAX_ALTERNATIVES,
    MatchCandidate,
};
pub use column::{MAX_SAMPLE_VALUES, SourceColumn, TargetField, check_unique_names};
pub use enums::{ColumnType, FieldCategory, MatchKind};
pub use error::{ModelError, Result};
pub use summary::SummaryStats;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_is_zero_for_empty_runs() {
        assert_eq!(SummaryStats::default().coverage(), 0.0);
    }

    #[test]
    fn source_column_round_trips_json() {
        let column = SourceColumn::new("Finish Time", ColumnType::Time)
            .with_samples(vec!["1:02.33".to_string()]);
        let json = serde_json::to_string(&column).expect("serialize column");
        assert!(json.contains("\"inferred_type\":\"time\""));
        let round: SourceColumn = serde_json::from_str(&json).expect("deserialize column");
        assert_eq!(round, column);
    }
}
