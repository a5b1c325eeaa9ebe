//! Mapping state for interactive review workflows.
//!
//! A [`MappingSession`] keeps the inputs of one run next to its current
//! assignments, so a reviewer can override or clear individual mappings
//! and read back updated statistics.

use std::collections::BTreeSet;

use fieldmap_model::{
    Assignment, AssignmentPhase, AssignmentSet, MatchCandidate, MatchKind, SourceColumn,
    SummaryStats, TargetField,
};

use crate::config::EngineConfig;
use crate::engine::MappingEngine;
use crate::error::SessionError;
use crate::resolve::validate;
use crate::summary::summarize;

/// Inputs and current assignments of one mapping run.
#[derive(Debug, Clone)]
pub struct MappingSession {
    engine: MappingEngine,
    columns: Vec<SourceColumn>,
    fields: Vec<TargetField>,
    assignments: AssignmentSet,
}

impl MappingSession {
    /// Runs the full pipeline and keeps its result as the starting state.
    pub fn new(columns: Vec<SourceColumn>, fields: Vec<TargetField>, config: EngineConfig) -> Self {
        let engine = MappingEngine::new(config);
        let assignments = engine.run(&columns, &fields).assignments;
        Self {
            engine,
            columns,
            fields,
            assignments,
        }
    }

    pub fn columns(&self) -> &[SourceColumn] {
        &self.columns
    }

    pub fn fields(&self) -> &[TargetField] {
        &self.fields
    }

    pub fn assignments(&self) -> &AssignmentSet {
        &self.assignments
    }

    /// Current entry of a source column (case-insensitive).
    pub fn assignment(&self, column: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.source_column.eq_ignore_ascii_case(column))
    }

    /// Maps a column onto a field by hand at full confidence.
    ///
    /// The set is re-validated afterwards, so a previous holder of the field
    /// moves to one of its alternatives or is flagged unresolved.
    pub fn override_mapping(&mut self, column: &str, field: &str) -> Result<(), SessionError> {
        let target = self
            .fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
            .cloned()
            .ok_or_else(|| SessionError::FieldNotFound(field.to_string()))?;
        let entry = self
            .assignments
            .iter_mut()
            .find(|a| a.source_column.eq_ignore_ascii_case(column))
            .ok_or_else(|| SessionError::ColumnNotFound(column.to_string()))?;

        let previous = entry.target_name().map(str::to_string);
        let candidate = MatchCandidate {
            source_column: entry.source_column.clone(),
            rationale: format!("manual mapping onto '{}'", target.name),
            target_field: target,
            confidence: 1.0,
            kind: MatchKind::Manual,
        };
        if let Some(previous) = previous.filter(|p| *p != candidate.target_name()) {
            entry.alternatives.retain(|c| c.target_name() != candidate.target_name());
            tracing::debug!(column = %entry.source_column, previous = %previous, "overriding mapping");
        }
        entry.commit(candidate, AssignmentPhase::Manual);
        self.revalidate();
        Ok(())
    }

    /// Drops the target of a column. Returns false when it had none.
    ///
    /// The set is re-validated, so an entry left unresolved on the freed
    /// field takes it back.
    pub fn clear_mapping(&mut self, column: &str) -> Result<bool, SessionError> {
        let entry = self
            .assignments
            .iter_mut()
            .find(|a| a.source_column.eq_ignore_ascii_case(column))
            .ok_or_else(|| SessionError::ColumnNotFound(column.to_string()))?;
        if entry.target.is_none() {
            return Ok(false);
        }
        entry.clear("cleared by reviewer");
        self.revalidate();
        Ok(true)
    }

    fn revalidate(&mut self) {
        let assignments = std::mem::take(&mut self.assignments);
        self.assignments = validate(assignments, &self.engine.config().resolver);
    }

    /// Fields no mapped entry currently holds, in schema order.
    pub fn available_fields(&self) -> Vec<&TargetField> {
        let used: BTreeSet<&str> = self.assignments.used_targets();
        self.fields
            .iter()
            .filter(|f| !used.contains(f.name.as_str()))
            .collect()
    }

    /// Source columns without a mapped target, in input order.
    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|a| !a.is_mapped())
            .map(|a| a.source_column.as_str())
            .collect()
    }

    pub fn summary(&self) -> SummaryStats {
        summarize(&self.assignments, &self.engine.config().confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{find_conflicts, is_consistent};
    use fieldmap_model::{AssignmentState, ColumnType, ConflictState};

    fn session() -> MappingSession {
        let columns = ["Place", "Swimmer", "Finish_Time"]
            .into_iter()
            .map(|n| SourceColumn::new(n, ColumnType::Text))
            .collect();
        let fields = ["place", "name", "time", "team"]
            .into_iter()
            .map(|n| TargetField::new(n, ColumnType::Text))
            .collect();
        MappingSession::new(columns, fields, EngineConfig::default())
    }

    #[test]
    fn new_runs_the_pipeline() {
        let session = session();
        assert_eq!(session.summary().mapped, 3);
        assert_eq!(
            session.assignment("swimmer").and_then(|a| a.target_name()),
            Some("name")
        );
        let available: Vec<_> = session.available_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(available, vec!["team"]);
    }

    #[test]
    fn override_takes_field_from_previous_holder() {
        let mut session = session();
        session.override_mapping("Finish_Time", "place").unwrap();

        let finish = session.assignment("Finish_Time").unwrap();
        assert_eq!(finish.target_name(), Some("place"));
        assert_eq!(finish.kind, MatchKind::Manual);
        assert_eq!(finish.confidence, 1.0);
        assert_eq!(finish.state, AssignmentState::Final);

        let place = session.assignment("Place").unwrap();
        assert!(matches!(
            place.conflict,
            ConflictState::Reassigned { .. } | ConflictState::Unresolved
        ));
        let stats = session.summary();
        assert_eq!(stats.total_columns, 3);
    }

    #[test]
    fn override_rejects_unknown_names() {
        let mut session = session();
        assert_eq!(
            session.override_mapping("nope", "place"),
            Err(SessionError::ColumnNotFound("nope".to_string()))
        );
        assert_eq!(
            session.override_mapping("Place", "nope"),
            Err(SessionError::FieldNotFound("nope".to_string()))
        );
    }

    #[test]
    fn clear_frees_the_field() {
        let mut session = session();
        assert_eq!(session.clear_mapping("Place"), Ok(true));
        assert_eq!(session.clear_mapping("Place"), Ok(false));
        assert!(session.available_fields().iter().any(|f| f.name == "place"));
        assert_eq!(session.unmapped_columns(), vec!["Place"]);
        assert_eq!(session.summary().mapped, 2);
    }

    #[test]
    fn clearing_an_override_returns_the_field() {
        let columns = vec![
            SourceColumn::new("time", ColumnType::Text),
            SourceColumn::new("lap_time", ColumnType::Text),
        ];
        let fields = vec![
            TargetField::new("time", ColumnType::Text),
            TargetField::new("split", ColumnType::Text),
        ];
        let mut session = MappingSession::new(columns, fields, EngineConfig::default());
        session.override_mapping("lap_time", "time").unwrap();
        assert!(session.assignment("time").unwrap().is_unresolved());

        assert_eq!(session.clear_mapping("lap_time"), Ok(true));

        let time = session.assignment("time").unwrap();
        assert_eq!(time.target_name(), Some("time"));
        assert_eq!(time.conflict, ConflictState::None);
        assert!(!time.rationale.contains("unresolved conflict"));
        assert!(is_consistent(session.assignments()));
        let available: Vec<_> = session.available_fields().iter().map(|f| f.name.as_str()).collect();
        assert!(!available.contains(&"time"));
        assert!(find_conflicts(session.assignments()).is_empty());
    }
}
