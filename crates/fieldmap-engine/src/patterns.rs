//! Domain vocabulary: the synonym table, relevance scoring and the
//! forced-assignment preference table.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{contains_words, normalize_text};

/// A canonical domain concept and the names it is known by.
#[derive(Debug, Clone, Copy)]
pub struct DomainConcept {
    pub canonical: &'static str,
    /// Normalized (lowercase, space-separated) alternative names.
    pub synonyms: &'static [&'static str],
}

impl DomainConcept {
    /// Canonical term first, then synonyms.
    pub fn terms(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.canonical).chain(self.synonyms.iter().copied())
    }
}

/// Bidirectional synonym table for competition result data.
pub const DOMAIN_CONCEPTS: &[DomainConcept] = &[
    DomainConcept {
        canonical: "name",
        synonyms: &[
            "athlete",
            "swimmer",
            "participant",
            "competitor",
            "runner",
            "player",
            "full name",
            "athlete name",
        ],
    },
    DomainConcept {
        canonical: "time",
        synonyms: &[
            "duration",
            "finish",
            "result",
            "elapsed",
            "final time",
            "finish time",
            "swim time",
        ],
    },
    DomainConcept {
        canonical: "place",
        synonyms: &["rank", "position", "pos", "standing", "placing", "finish place"],
    },
    DomainConcept {
        canonical: "team",
        synonyms: &["club", "country", "nation", "squad", "affiliation"],
    },
    DomainConcept {
        canonical: "event",
        synonyms: &["race", "discipline", "heat", "stroke", "distance"],
    },
    DomainConcept {
        canonical: "age",
        synonyms: &["years", "age group"],
    },
    DomainConcept {
        canonical: "gender",
        synonyms: &["sex"],
    },
    DomainConcept {
        canonical: "date",
        synonyms: &["day", "meet date", "event date"],
    },
    DomainConcept {
        canonical: "score",
        synonyms: &["points", "pts"],
    },
    DomainConcept {
        canonical: "lane",
        synonyms: &["lane number"],
    },
    DomainConcept {
        canonical: "split",
        synonyms: &["lap", "lap time", "interval"],
    },
    DomainConcept {
        canonical: "bib",
        synonyms: &["bib number", "athlete id", "competitor id"],
    },
];

/// How a normalized name relates to one concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TermHit {
    /// Mentions a term as a whole-word sequence.
    Mentions,
    /// Equals a synonym.
    Synonym,
    /// Equals the canonical term.
    Canonical,
}

impl DomainConcept {
    /// Strongest relation between a normalized name and this concept.
    pub fn hit(&self, normalized: &str) -> Option<TermHit> {
        if normalized == self.canonical {
            return Some(TermHit::Canonical);
        }
        if self.synonyms.iter().any(|s| *s == normalized) {
            return Some(TermHit::Synonym);
        }
        self.terms()
            .any(|term| contains_words(normalized, term))
            .then_some(TermHit::Mentions)
    }

    /// First term the normalized name mentions, for rationale text.
    pub fn mentioned_term(&self, normalized: &str) -> Option<&'static str> {
        self.terms().find(|term| contains_words(normalized, term))
    }
}

/// True when a normalized name equals any domain term.
pub fn is_domain_term(normalized: &str) -> bool {
    DOMAIN_CONCEPTS
        .iter()
        .any(|concept| concept.terms().any(|term| term == normalized))
}

/// Relevance of a field name to the domain vocabulary, 0 to 10.
///
/// Equals a canonical term: 10; equals a synonym: 8; mentions a canonical
/// term: 6; mentions a synonym: 5; otherwise 0.
pub fn domain_relevance(name: &str) -> f64 {
    let normalized = normalize_text(name);
    if normalized.is_empty() {
        return 0.0;
    }
    DOMAIN_CONCEPTS
        .iter()
        .filter_map(|concept| match concept.hit(&normalized)? {
            TermHit::Canonical => Some(10.0),
            TermHit::Synonym => Some(8.0),
            TermHit::Mentions => {
                if contains_words(&normalized, concept.canonical) {
                    Some(6.0)
                } else {
                    Some(5.0)
                }
            }
        })
        .fold(0.0, f64::max)
}

/// A column-name pattern and the kind of field it prefers when forced.
pub struct ForcedPreference {
    pub label: &'static str,
    column: Regex,
    field: Regex,
}

impl ForcedPreference {
    pub fn applies_to(&self, column_name: &str) -> bool {
        self.column.is_match(column_name)
    }

    pub fn prefers(&self, field_name: &str) -> bool {
        self.field.is_match(field_name)
    }
}

/// Preferences consulted in order when a column has to be forced onto a field.
pub static FORCED_PREFERENCES: LazyLock<Vec<ForcedPreference>> = LazyLock::new(|| {
    [
        ("time", r"(?i)time|duration|elapsed", r"(?i)time|duration|result|finish"),
        (
            "name",
            r"(?i)name|athlete|swimmer|participant",
            r"(?i)name|athlete|swimmer|participant",
        ),
        ("place", r"(?i)place|rank|position", r"(?i)place|rank|position"),
        ("team", r"(?i)team|club|country|nation", r"(?i)team|club|country|nation"),
        ("event", r"(?i)event|race|stroke", r"(?i)event|race|stroke|discipline"),
        ("date", r"(?i)date|day", r"(?i)date|day"),
        ("age", r"(?i)\bage|year", r"(?i)\bage|year"),
    ]
    .into_iter()
    .map(|(label, column, field)| ForcedPreference {
        label,
        column: Regex::new(column).expect("Invalid forced-preference column regex"),
        field: Regex::new(field).expect("Invalid forced-preference field regex"),
    })
    .collect()
});

/// Preferences whose column pattern matches, in table order.
pub fn forced_preferences_for(column_name: &str) -> impl Iterator<Item = &'static ForcedPreference> + '_ {
    FORCED_PREFERENCES
        .iter()
        .filter(move |pref| pref.applies_to(column_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relevance_tiers() {
        assert_eq!(domain_relevance("Name"), 10.0);
        assert_eq!(domain_relevance("Swimmer"), 8.0);
        assert_eq!(domain_relevance("finish_time"), 8.0);
        assert_eq!(domain_relevance("best_time_2023"), 6.0);
        assert_eq!(domain_relevance("club_code"), 5.0);
        assert_eq!(domain_relevance("qrs789"), 0.0);
        assert_eq!(domain_relevance(""), 0.0);
    }

    #[test]
    fn concept_hits_rank_exactness() {
        let name = &DOMAIN_CONCEPTS[0];
        assert_eq!(name.hit("name"), Some(TermHit::Canonical));
        assert_eq!(name.hit("swimmer"), Some(TermHit::Synonym));
        assert_eq!(name.hit("athlete name"), Some(TermHit::Synonym));
        assert_eq!(name.hit("swimmer id"), Some(TermHit::Mentions));
        assert_eq!(name.hit("team"), None);
    }

    #[test]
    fn forced_preferences_match_column_patterns() {
        let labels: Vec<_> = forced_preferences_for("Lap_Duration")
            .map(|p| p.label)
            .collect();
        assert_eq!(labels, vec!["time"]);
        let time = forced_preferences_for("time").next().unwrap();
        assert!(time.prefers("Result"));
        assert!(!time.prefers("Swimmer"));
    }
}
