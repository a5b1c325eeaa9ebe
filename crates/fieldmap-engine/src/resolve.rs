//! Conflict resolution over a tentative assignment set.
//!
//! [`validate`] guarantees that no two mapped entries share a target field.
//! Entries are walked strongest first; the first holder of a field keeps it,
//! later claimants move to a free alternative or are flagged unresolved.
//! A set that is already consistent is only finalized, never re-penalized,
//! so the pass is idempotent.

use std::collections::{BTreeMap, BTreeSet};

use fieldmap_model::{Assignment, AssignmentSet, AssignmentState, ConflictState, MatchKind};

use crate::config::ResolverPenalties;

const UNRESOLVED_NOTE: &str = "; unresolved conflict:";

/// True when mapped targets are unique and every unresolved entry points at
/// a field a mapped entry holds.
pub fn is_consistent(set: &AssignmentSet) -> bool {
    entries_consistent(set.as_slice())
}

fn entries_consistent(entries: &[Assignment]) -> bool {
    let mut held = BTreeSet::new();
    for entry in entries.iter().filter(|e| e.is_mapped()) {
        if let Some(target) = entry.target_name()
            && !held.insert(target)
        {
            return false;
        }
    }
    entries
        .iter()
        .filter(|e| e.is_unresolved())
        .all(|e| e.target_name().is_some_and(|t| held.contains(t)))
}

/// Target fields claimed by more than one entry, with the claimants in input order.
///
/// Unresolved entries count as claimants.
pub fn find_conflicts(set: &AssignmentSet) -> BTreeMap<&str, Vec<&str>> {
    let mut claims: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for entry in set {
        if let Some(target) = entry.target_name() {
            claims
                .entry(target)
                .or_default()
                .push(entry.source_column.as_str());
        }
    }
    claims.retain(|_, columns| columns.len() > 1);
    claims
}

/// Resolves duplicate targets and finalizes every entry.
///
/// Total: never fails, keeps one entry per column in input order.
pub fn validate(set: AssignmentSet, penalties: &ResolverPenalties) -> AssignmentSet {
    let mut entries = set.into_vec();
    for entry in &mut entries {
        if entry.confidence.is_nan() {
            entry.confidence = 0.0;
        }
    }

    if !entries_consistent(&entries) {
        resolve(&mut entries, penalties);
    }

    for entry in &mut entries {
        entry.confidence = entry.confidence.clamp(0.0, 1.0);
        entry.state = AssignmentState::Final;
    }
    AssignmentSet::new(entries)
}

fn resolve(entries: &mut [Assignment], penalties: &ResolverPenalties) {
    // Stable sort: equal confidence keeps manual entries first, then input order.
    let mut order: Vec<usize> = (0..entries.len())
        .filter(|&i| entries[i].target.is_some())
        .collect();
    order.sort_by(|&a, &b| {
        let (ea, eb) = (&entries[a], &entries[b]);
        eb.confidence
            .total_cmp(&ea.confidence)
            .then_with(|| (eb.kind == MatchKind::Manual).cmp(&(ea.kind == MatchKind::Manual)))
    });

    for entry in entries.iter_mut().filter(|e| e.target.is_none()) {
        entry.conflict = ConflictState::None;
    }

    // Primary claims in walk order, as they stood before any reassignment.
    let claims: Vec<(String, f64)> = order
        .iter()
        .filter_map(|&i| {
            let entry = &entries[i];
            entry
                .target_name()
                .map(|t| (t.to_string(), entry.confidence))
        })
        .collect();

    let mut used: BTreeSet<String> = BTreeSet::new();
    for (step, &index) in order.iter().enumerate() {
        let stronger_later_claim = |field: &str, confidence: f64| {
            claims[step + 1..]
                .iter()
                .any(|(target, claimed)| target == field && *claimed > confidence)
        };
        let entry = &mut entries[index];
        let Some(target) = entry.target_name().map(str::to_string) else {
            continue;
        };
        if used.insert(target.clone()) {
            if entry.conflict == ConflictState::Unresolved {
                // The stronger holder is gone; the discount stays.
                entry.conflict = ConflictState::None;
                if let Some(pos) = entry.rationale.find(UNRESOLVED_NOTE) {
                    entry.rationale.truncate(pos);
                }
            }
            continue;
        }

        // An alternative never displaces a later entry whose own claim is stronger.
        let free = entry.alternatives.iter().position(|alt| {
            !used.contains(alt.target_name())
                && !stronger_later_claim(
                    alt.target_name(),
                    reassigned_confidence(alt.confidence, penalties),
                )
        });
        match free {
            Some(position) => {
                let alternative = entry.alternatives.remove(position);
                used.insert(alternative.target_name().to_string());
                entry.confidence = reassigned_confidence(alternative.confidence, penalties);
                entry.kind = alternative.kind;
                entry.rationale = format!(
                    "{} (reassigned: '{target}' was taken by a stronger mapping)",
                    alternative.rationale
                );
                entry.target = Some(alternative.target_field);
                entry.conflict = ConflictState::Reassigned { previous: target };
                tracing::debug!(
                    column = %entry.source_column,
                    field = entry.target_name().unwrap_or_default(),
                    confidence = entry.confidence,
                    "reassigned to alternative"
                );
            }
            None => {
                let discounted = (entry.confidence * penalties.unresolved_penalty)
                    .max(penalties.unresolved_floor.min(entry.confidence));
                entry.confidence = discounted;
                entry.conflict = ConflictState::Unresolved;
                entry.rationale.push_str(&format!(
                    "{UNRESOLVED_NOTE} '{target}' is held by a stronger mapping"
                ));
                tracing::warn!(
                    column = %entry.source_column,
                    field = %target,
                    confidence = discounted,
                    "unresolved mapping conflict"
                );
            }
        }
    }
}

fn reassigned_confidence(alternative: f64, penalties: &ResolverPenalties) -> f64 {
    (alternative * penalties.reassignment_penalty)
        .max(penalties.reassignment_floor)
        .min(1.0)
}
