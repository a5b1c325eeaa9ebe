//! Property tests over generated column and field lists.

use std::collections::BTreeSet;

use fieldmap_engine::{EngineConfig, ResolverPenalties, domain_relevance, map_columns, validate};
use fieldmap_model::{
    Assignment, AssignmentPhase, AssignmentSet, ColumnType, MatchCandidate, MatchKind,
    SourceColumn, TargetField,
};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::select;

const VOCABULARY: &[&str] = &[
    "place",
    "name",
    "time",
    "team",
    "athlete_name",
    "lap_time",
    "Finish_Time",
    "club",
    "rank",
    "swimmer",
    "age",
    "event",
    "split",
    "pos",
    "xyz123",
    "qrs789",
];

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        select(VOCABULARY).prop_map(str::to_string),
        "[a-z]{1,8}(_[a-z]{1,6})?",
    ]
}

/// Names unique under case folding, like a validated batch.
fn unique_names(max: usize) -> impl Strategy<Value = Vec<String>> {
    vec(name_strategy(), 0..max).prop_map(|names| {
        let mut seen = BTreeSet::new();
        names
            .into_iter()
            .filter(|n| seen.insert(n.to_lowercase()))
            .collect()
    })
}

fn type_strategy() -> impl Strategy<Value = ColumnType> {
    select(ColumnType::ALL.to_vec())
}

fn inputs() -> impl Strategy<Value = (Vec<SourceColumn>, Vec<TargetField>)> {
    (unique_names(10), unique_names(10))
        .prop_flat_map(|(columns, fields)| {
            let (nc, nf) = (columns.len(), fields.len());
            (
                Just(columns),
                Just(fields),
                vec(type_strategy(), nc),
                vec(type_strategy(), nf),
                vec(0.0..=10.0f64, nf),
            )
        })
        .prop_map(|(columns, fields, column_types, field_types, relevance)| {
            let columns = columns
                .into_iter()
                .zip(column_types)
                .map(|(name, ty)| SourceColumn::new(name, ty))
                .collect();
            let fields = fields
                .into_iter()
                .zip(field_types)
                .zip(relevance)
                .map(|((name, ty), rel)| TargetField::new(name, ty).with_relevance(rel))
                .collect();
            (columns, fields)
        })
}

/// Same inputs, with relevance computed from each field name.
fn inputs_with_name_relevance() -> impl Strategy<Value = (Vec<SourceColumn>, Vec<TargetField>)> {
    inputs().prop_map(|(columns, fields)| {
        let fields = fields
            .into_iter()
            .map(|f| {
                let relevance = domain_relevance(&f.name);
                f.with_relevance(relevance)
            })
            .collect();
        (columns, fields)
    })
}

fn candidate(column: &str, field: &str, confidence: f64) -> MatchCandidate {
    MatchCandidate {
        source_column: column.to_string(),
        target_field: TargetField::new(field, ColumnType::Text),
        confidence,
        kind: MatchKind::Contains,
        rationale: String::new(),
    }
}

/// Hand-built sets with plenty of duplicate targets.
fn contested_sets() -> impl Strategy<Value = AssignmentSet> {
    let pool = vec!["x", "y", "z", "w"];
    vec(
        (
            select(pool.clone()),
            0.0..=1.0f64,
            vec((select(pool), 0.0..=1.0f64), 0..3),
        ),
        0..8,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (target, confidence, alternatives))| {
                let column = format!("c{i}");
                let mut entry = Assignment::unassigned(column.clone());
                entry.alternatives = alternatives
                    .into_iter()
                    .map(|(f, c)| candidate(&column, f, c))
                    .collect();
                entry.commit(candidate(&column, target, confidence), AssignmentPhase::Precision);
                entry
            })
            .collect()
    })
}

fn assert_unique_mapped(set: &AssignmentSet) -> Result<(), TestCaseError> {
    let mut seen = BTreeSet::new();
    for entry in set.mapped() {
        let target = entry.target_name().unwrap_or_default();
        prop_assert!(seen.insert(target), "'{}' mapped twice", target);
    }
    Ok(())
}

proptest! {
    #[test]
    fn every_column_gets_one_entry((columns, fields) in inputs()) {
        let outcome = map_columns(&columns, &fields, &EngineConfig::default());
        prop_assert_eq!(outcome.assignments.len(), columns.len());
        for (column, entry) in columns.iter().zip(&outcome.assignments) {
            prop_assert_eq!(&entry.source_column, &column.name);
        }
        prop_assert_eq!(outcome.summary.total_columns, columns.len());
    }

    #[test]
    fn mapped_targets_are_unique((columns, fields) in inputs()) {
        let outcome = map_columns(&columns, &fields, &EngineConfig::default());
        assert_unique_mapped(&outcome.assignments)?;
    }

    #[test]
    fn confidences_stay_in_bounds((columns, fields) in inputs()) {
        let config = EngineConfig::default();
        let outcome = map_columns(&columns, &fields, &config);
        for entry in &outcome.assignments {
            prop_assert!((0.0..=1.0).contains(&entry.confidence));
            if entry.target.is_none() {
                prop_assert!(
                    entry.confidence == 0.0
                        || entry.confidence == config.phases.exhausted_placeholder
                );
            }
        }
        for candidate in outcome.assignments.iter().flat_map(|a| &a.alternatives) {
            prop_assert!((0.0..=1.0).contains(&candidate.confidence));
        }
    }

    #[test]
    fn only_exact_matches_reach_full_confidence((columns, fields) in inputs_with_name_relevance()) {
        let config = EngineConfig::default();
        let outcome = map_columns(&columns, &fields, &config);
        for entry in outcome.assignments.iter().filter(|a| a.kind != MatchKind::Exact) {
            prop_assert!(
                entry.confidence <= config.weights.inexact_cap,
                "{} scored {} as {}",
                entry.source_column,
                entry.confidence,
                entry.kind
            );
        }
    }

    #[test]
    fn exact_names_always_pair((columns, fields) in inputs()) {
        let outcome = map_columns(&columns, &fields, &EngineConfig::default());
        for column in &columns {
            let Some(field) = fields
                .iter()
                .find(|f| f.name.to_lowercase() == column.name.to_lowercase())
            else {
                continue;
            };
            let entry = outcome.assignments.get(&column.name).unwrap();
            prop_assert_eq!(entry.target_name(), Some(field.name.as_str()));
            prop_assert_eq!(entry.confidence, 1.0);
            prop_assert_eq!(entry.kind, MatchKind::Exact);
        }
    }

    #[test]
    fn pipeline_output_is_a_validation_fixed_point((columns, fields) in inputs()) {
        let config = EngineConfig::default();
        let outcome = map_columns(&columns, &fields, &config);
        let again = validate(outcome.assignments.clone(), &config.resolver);
        prop_assert_eq!(again, outcome.assignments);
    }

    #[test]
    fn validation_removes_duplicates(set in contested_sets()) {
        let validated = validate(set.clone(), &ResolverPenalties::default());
        prop_assert_eq!(validated.len(), set.len());
        assert_unique_mapped(&validated)?;
        for entry in &validated {
            prop_assert!((0.0..=1.0).contains(&entry.confidence));
        }
    }

    #[test]
    fn validation_is_idempotent(set in contested_sets()) {
        let penalties = ResolverPenalties::default();
        let once = validate(set, &penalties);
        let twice = validate(once.clone(), &penalties);
        prop_assert_eq!(once, twice);
    }
}
