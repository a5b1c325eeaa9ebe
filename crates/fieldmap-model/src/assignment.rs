//! Mapping records produced by the engine and read back by consumers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::column::TargetField;
use crate::enums::MatchKind;

/// Number of runner-up candidates kept on an assignment.
pub const MAX_ALTERNATIVES: usize = 3;

/// A scored (source column, target field) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub source_column: String,
    pub target_field: TargetField,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub kind: MatchKind,
    pub rationale: String,
}

impl MatchCandidate {
    pub fn target_name(&self) -> &str {
        &self.target_field.name
    }
}

/// Progress of a column through one mapping run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentState {
    #[default]
    Unassigned,
    /// Candidates exist but none has been committed yet.
    CandidateFound,
    /// Committed by a phase, not yet validated.
    Tentative,
    Final,
}

/// The pass that committed an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentPhase {
    Precision,
    Recall,
    Forced,
    Manual,
}

impl AssignmentPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentPhase::Precision => "precision",
            AssignmentPhase::Recall => "recall",
            AssignmentPhase::Forced => "forced",
            AssignmentPhase::Manual => "manual",
        }
    }
}

/// Outcome of conflict resolution for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ConflictState {
    #[default]
    None,
    /// Moved off a contested field onto one of its alternatives.
    Reassigned { previous: String },
    /// Still pinned to a field held by a stronger entry.
    Unresolved,
}

/// The mapping decision for one source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub source_column: String,
    pub target: Option<TargetField>,
    pub confidence: f64,
    pub kind: MatchKind,
    pub rationale: String,
    /// Runner-up candidates in rank order, at most [`MAX_ALTERNATIVES`].
    pub alternatives: Vec<MatchCandidate>,
    pub state: AssignmentState,
    pub phase: Option<AssignmentPhase>,
    pub conflict: ConflictState,
}

impl Assignment {
    /// An entry for a column nothing has been decided for yet.
    pub fn unassigned(source_column: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target: None,
            confidence: 0.0,
            kind: MatchKind::None,
            rationale: String::new(),
            alternatives: Vec::new(),
            state: AssignmentState::Unassigned,
            phase: None,
            conflict: ConflictState::None,
        }
    }

    pub fn target_name(&self) -> Option<&str> {
        self.target.as_ref().map(|f| f.name.as_str())
    }

    /// True when the entry holds a target that it owns uncontested.
    pub fn is_mapped(&self) -> bool {
        self.target.is_some() && self.conflict != ConflictState::Unresolved
    }

    pub fn is_unresolved(&self) -> bool {
        self.conflict == ConflictState::Unresolved
    }

    pub fn is_forced(&self) -> bool {
        self.phase == Some(AssignmentPhase::Forced) && self.target.is_some()
    }

    /// Commits a candidate to this entry.
    pub fn commit(&mut self, candidate: MatchCandidate, phase: AssignmentPhase) {
        self.target = Some(candidate.target_field);
        self.confidence = candidate.confidence.clamp(0.0, 1.0);
        self.kind = candidate.kind;
        self.rationale = candidate.rationale;
        self.state = AssignmentState::Tentative;
        self.phase = Some(phase);
        self.conflict = ConflictState::None;
    }

    /// Drops the target and resets the entry to an unmapped state.
    pub fn clear(&mut self, rationale: impl Into<String>) {
        self.target = None;
        self.confidence = 0.0;
        self.kind = MatchKind::None;
        self.rationale = rationale.into();
        self.phase = None;
        self.conflict = ConflictState::None;
        self.state = if self.alternatives.is_empty() {
            AssignmentState::Unassigned
        } else {
            AssignmentState::CandidateFound
        };
    }
}

/// The full result of a mapping run, one entry per source column in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentSet {
    entries: Vec<Assignment>,
}

impl AssignmentSet {
    pub fn new(entries: Vec<Assignment>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Assignment> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Assignment> {
        self.entries.iter_mut()
    }

    /// Looks up the entry for a source column (exact name).
    pub fn get(&self, source_column: &str) -> Option<&Assignment> {
        self.entries
            .iter()
            .find(|a| a.source_column == source_column)
    }

    /// Entries that own their target uncontested.
    pub fn mapped(&self) -> impl Iterator<Item = &Assignment> {
        self.entries.iter().filter(|a| a.is_mapped())
    }

    /// Names of targets held by mapped entries.
    pub fn used_targets(&self) -> BTreeSet<&str> {
        self.mapped().filter_map(Assignment::target_name).collect()
    }

    pub fn as_slice(&self) -> &[Assignment] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<Assignment> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a AssignmentSet {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Assignment> for AssignmentSet {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ColumnType;

    fn candidate(column: &str, field: &str, confidence: f64) -> MatchCandidate {
        MatchCandidate {
            source_column: column.to_string(),
            target_field: TargetField::new(field, ColumnType::Text),
            confidence,
            kind: MatchKind::Contains,
            rationale: "test".to_string(),
        }
    }

    #[test]
    fn commit_clamps_and_marks_tentative() {
        let mut entry = Assignment::unassigned("swimmer");
        entry.commit(candidate("swimmer", "name", 1.4), AssignmentPhase::Precision);
        assert_eq!(entry.confidence, 1.0);
        assert_eq!(entry.state, AssignmentState::Tentative);
        assert_eq!(entry.target_name(), Some("name"));
        assert!(entry.is_mapped());
    }

    #[test]
    fn unresolved_entries_do_not_count_as_mapped() {
        let mut entry = Assignment::unassigned("lap_time");
        entry.commit(candidate("lap_time", "time", 0.4), AssignmentPhase::Recall);
        entry.conflict = ConflictState::Unresolved;
        let set = AssignmentSet::new(vec![entry]);
        assert_eq!(set.mapped().count(), 0);
        assert!(set.used_targets().is_empty());
    }

    #[test]
    fn clear_keeps_alternatives_visible() {
        let mut entry = Assignment::unassigned("place");
        entry.alternatives.push(candidate("place", "rank", 0.6));
        entry.commit(candidate("place", "place", 1.0), AssignmentPhase::Precision);
        entry.clear("cleared by user");
        assert!(entry.target.is_none());
        assert_eq!(entry.confidence, 0.0);
        assert_eq!(entry.state, AssignmentState::CandidateFound);
    }

    #[test]
    fn set_serializes_as_plain_list() {
        let set: AssignmentSet = vec![Assignment::unassigned("a")].into_iter().collect();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["source_column"], "a");
        assert_eq!(json[0]["conflict"]["status"], "none");
    }
}
