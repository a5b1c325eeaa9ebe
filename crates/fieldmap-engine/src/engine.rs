//! Phased assignment of source columns to target fields.

use std::collections::BTreeSet;

use fieldmap_model::{
    Assignment, AssignmentPhase, AssignmentSet, AssignmentState, MAX_ALTERNATIVES, MatchCandidate,
    MatchKind, SourceColumn, SummaryStats, TargetField,
};
use serde::{Deserialize, Serialize};

use crate::candidates::rank_candidates;
use crate::config::EngineConfig;
use crate::patterns::forced_preferences_for;
use crate::resolve::validate;
use crate::score::Scorer;
use crate::summary::summarize;

/// Names of the target fields already committed during a run.
///
/// Passed explicitly from one phase to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumedFields(BTreeSet<String>);

impl ConsumedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.0.contains(field_name)
    }

    /// Returns false when the field was already consumed.
    pub fn insert(&mut self, field_name: &str) -> bool {
        self.0.insert(field_name.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Inputs of one run plus every column's ranked candidate list.
#[derive(Debug, Clone)]
pub struct AssignmentPlan<'a> {
    columns: &'a [SourceColumn],
    fields: &'a [TargetField],
    ranked: Vec<Vec<MatchCandidate>>,
}

impl<'a> AssignmentPlan<'a> {
    pub fn columns(&self) -> &'a [SourceColumn] {
        self.columns
    }

    pub fn fields(&self) -> &'a [TargetField] {
        self.fields
    }

    /// Ranked candidates of the column at `index`, best first.
    pub fn candidates(&self, index: usize) -> &[MatchCandidate] {
        self.ranked
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// One unassigned entry per column, in input order.
    pub fn initial_entries(&self) -> Vec<Assignment> {
        self.columns
            .iter()
            .zip(&self.ranked)
            .map(|(column, ranked)| {
                let mut entry = Assignment::unassigned(column.name.clone());
                entry.alternatives = ranked.iter().take(MAX_ALTERNATIVES).cloned().collect();
                if !ranked.is_empty() {
                    entry.state = AssignmentState::CandidateFound;
                }
                entry
            })
            .collect()
    }

    fn best_available(&self, index: usize, consumed: &ConsumedFields) -> Option<&MatchCandidate> {
        self.candidates(index)
            .iter()
            .find(|c| !consumed.contains(c.target_name()))
    }

    fn has_exact(&self, index: usize) -> bool {
        self.candidates(index)
            .iter()
            .any(|c| c.kind == MatchKind::Exact)
    }

    /// Runner-up candidates once `chosen` has been committed.
    fn runner_ups(&self, index: usize, chosen: &str) -> Vec<MatchCandidate> {
        self.candidates(index)
            .iter()
            .filter(|c| c.target_name() != chosen)
            .take(MAX_ALTERNATIVES)
            .cloned()
            .collect()
    }
}

/// Final result of a mapping run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingOutcome {
    pub assignments: AssignmentSet,
    pub summary: SummaryStats,
}

/// Engine for mapping source columns onto target fields.
///
/// Columns are assigned in three passes sharing one [`ConsumedFields`] set:
///
/// - precision: strong candidates, columns with an exact match first
/// - recall: weaker candidates, lifted to a display minimum
/// - forced: every remaining column takes some unconsumed field
///
/// [`MappingEngine::run`] then validates the set and summarizes it.
///
/// # Example
///
/// ```
/// use fieldmap_engine::{EngineConfig, MappingEngine};
/// use fieldmap_model::{ColumnType, SourceColumn, TargetField};
///
/// let engine = MappingEngine::new(EngineConfig::default());
/// let columns = vec![SourceColumn::new("Swimmer", ColumnType::Text)];
/// let fields = vec![TargetField::new("name", ColumnType::Text)];
/// let outcome = engine.run(&columns, &fields);
/// assert_eq!(outcome.summary.mapped, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappingEngine {
    config: EngineConfig,
    scorer: Scorer,
}

impl MappingEngine {
    pub fn new(config: EngineConfig) -> Self {
        let scorer = Scorer::new(config.weights);
        Self { config, scorer }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Ranked candidates of one column against all fields.
    pub fn candidates_for(
        &self,
        column: &SourceColumn,
        fields: &[TargetField],
    ) -> Vec<MatchCandidate> {
        rank_candidates(&self.scorer, column, fields, self.config.candidate_epsilon)
    }

    /// Scores every column against every field.
    pub fn plan<'a>(
        &self,
        columns: &'a [SourceColumn],
        fields: &'a [TargetField],
    ) -> AssignmentPlan<'a> {
        let ranked = columns
            .iter()
            .map(|column| self.candidates_for(column, fields))
            .collect();
        AssignmentPlan {
            columns,
            fields,
            ranked,
        }
    }

    /// Commits candidates above the precision threshold.
    ///
    /// Columns with an exact candidate go first so an exact pairing is
    /// never lost to a weaker claim on the same field. Returns the number
    /// of commits.
    pub fn precision_pass(
        &self,
        plan: &AssignmentPlan<'_>,
        entries: &mut [Assignment],
        consumed: &mut ConsumedFields,
    ) -> usize {
        let threshold = self.config.phases.precision;
        let (exact, rest): (Vec<usize>, Vec<usize>) =
            (0..entries.len()).partition(|&i| plan.has_exact(i));

        let mut committed = 0;
        for index in exact.into_iter().chain(rest) {
            let candidates = plan.candidates(index);
            let choice = candidates
                .iter()
                .find(|c| c.kind == MatchKind::Exact && !consumed.contains(c.target_name()))
                .or_else(|| plan.best_available(index, consumed));
            let Some(choice) = choice.filter(|c| c.confidence > threshold) else {
                continue;
            };
            commit(plan, entries, consumed, index, choice.clone(), AssignmentPhase::Precision);
            committed += 1;
        }
        committed
    }

    /// Commits remaining columns whose best available candidate clears the
    /// recall threshold. Confidence is lifted to the recall floor.
    pub fn recall_pass(
        &self,
        plan: &AssignmentPlan<'_>,
        entries: &mut [Assignment],
        consumed: &mut ConsumedFields,
    ) -> usize {
        let phases = &self.config.phases;
        let mut committed = 0;
        for index in 0..entries.len() {
            if entries[index].target.is_some() {
                continue;
            }
            let Some(best) = plan
                .best_available(index, consumed)
                .filter(|c| c.confidence > phases.recall)
            else {
                continue;
            };
            let mut candidate = best.clone();
            candidate.confidence = candidate.confidence.max(phases.recall_floor);
            candidate.rationale.push_str(&format!(
                "; accepted in relaxed pass (threshold {:.2})",
                phases.recall
            ));
            commit(plan, entries, consumed, index, candidate, AssignmentPhase::Recall);
            committed += 1;
        }
        committed
    }

    /// Gives every remaining column an unconsumed field, or the exhaustion
    /// placeholder once no field is left.
    pub fn forced_pass(
        &self,
        plan: &AssignmentPlan<'_>,
        entries: &mut [Assignment],
        consumed: &mut ConsumedFields,
    ) -> usize {
        let phases = &self.config.phases;
        let mut committed = 0;
        for index in 0..entries.len() {
            if entries[index].target.is_some() {
                continue;
            }
            let Some(column) = plan.columns().get(index) else {
                continue;
            };
            let Some((field, reason)) = forced_choice(plan, index, column, consumed) else {
                let entry = &mut entries[index];
                entry.confidence = phases.exhausted_placeholder;
                entry.kind = MatchKind::None;
                entry.rationale = format!(
                    "all {} target fields were taken before '{}' could be placed",
                    plan.fields().len(),
                    column.name
                );
                tracing::debug!(column = %column.name, "no target fields left");
                continue;
            };

            let score = self.scorer.score(column, field).confidence;
            let candidate = MatchCandidate {
                source_column: column.name.clone(),
                target_field: field.clone(),
                confidence: score.max(phases.forced_floor),
                kind: MatchKind::Forced,
                rationale: format!("{reason} (pair score {score:.2})"),
            };
            commit(plan, entries, consumed, index, candidate, AssignmentPhase::Forced);
            committed += 1;
        }
        committed
    }

    /// Runs the three passes and returns the tentative, unvalidated set.
    pub fn assign(&self, columns: &[SourceColumn], fields: &[TargetField]) -> AssignmentSet {
        let plan = self.plan(columns, fields);
        let mut entries = plan.initial_entries();
        let mut consumed = ConsumedFields::new();

        let precision = self.precision_pass(&plan, &mut entries, &mut consumed);
        let recall = self.recall_pass(&plan, &mut entries, &mut consumed);
        let forced = self.forced_pass(&plan, &mut entries, &mut consumed);
        tracing::debug!(
            precision,
            recall,
            forced,
            consumed = consumed.len(),
            "assignment passes complete"
        );

        AssignmentSet::new(entries)
    }

    /// Assigns, validates and summarizes.
    pub fn run(&self, columns: &[SourceColumn], fields: &[TargetField]) -> MappingOutcome {
        let tentative = self.assign(columns, fields);
        let assignments = validate(tentative, &self.config.resolver);
        let summary = summarize(&assignments, &self.config.confidence);
        tracing::info!(
            columns = summary.total_columns,
            mapped = summary.mapped,
            forced = summary.forced,
            unresolved = summary.unresolved_conflicts,
            mean_confidence = summary.mean_confidence,
            "mapping run complete"
        );
        MappingOutcome {
            assignments,
            summary,
        }
    }
}

fn commit(
    plan: &AssignmentPlan<'_>,
    entries: &mut [Assignment],
    consumed: &mut ConsumedFields,
    index: usize,
    candidate: MatchCandidate,
    phase: AssignmentPhase,
) {
    consumed.insert(candidate.target_name());
    let entry = &mut entries[index];
    entry.alternatives = plan.runner_ups(index, candidate.target_name());
    tracing::debug!(
        column = %entry.source_column,
        field = %candidate.target_name(),
        confidence = candidate.confidence,
        phase = phase.as_str(),
        "committed"
    );
    entry.commit(candidate, phase);
}

/// Field choice for a forced column: a name-pattern preference, then the
/// best remaining weak candidate, then the first remaining field.
fn forced_choice<'a>(
    plan: &AssignmentPlan<'a>,
    index: usize,
    column: &SourceColumn,
    consumed: &ConsumedFields,
) -> Option<(&'a TargetField, String)> {
    let fields = plan.fields();

    for preference in forced_preferences_for(&column.name) {
        if let Some(field) = fields
            .iter()
            .find(|f| !consumed.contains(&f.name) && preference.prefers(&f.name))
        {
            return Some((
                field,
                format!("forced onto '{}' by the {} preference", field.name, preference.label),
            ));
        }
    }

    if let Some(weak) = plan.best_available(index, consumed)
        && let Some(field) = fields.iter().find(|f| f.name == weak.target_name())
    {
        return Some((
            field,
            format!("forced onto weak candidate '{}'", field.name),
        ));
    }

    fields.iter().find(|f| !consumed.contains(&f.name)).map(|field| {
        (
            field,
            format!("forced onto first remaining field '{}'", field.name),
        )
    })
}
