//! Column-to-field mapping engine.
//!
//! Scores source columns against target fields with a cascade of name
//! heuristics, assigns them in precision, recall and forced passes,
//! resolves duplicate targets and summarizes the result.
//!
//! ```
//! use fieldmap_engine::{EngineConfig, map_columns};
//! use fieldmap_model::{ColumnType, SourceColumn, TargetField};
//!
//! let columns = vec![
//!     SourceColumn::new("place", ColumnType::Numeric),
//!     SourceColumn::new("athlete_name", ColumnType::Text),
//! ];
//! let fields = vec![
//!     TargetField::new("place", ColumnType::Numeric),
//!     TargetField::new("name", ColumnType::Text),
//! ];
//! let outcome = map_columns(&columns, &fields, &EngineConfig::default());
//! assert_eq!(outcome.summary.mapped, 2);
//! ```

pub mod candidates;
pub mod config;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod patterns;
pub mod resolve;
pub mod score;
pub mod state;
pub mod summary;
mod utils;

pub use candidates::rank_candidates;
pub use config::{
    ConfidenceLevel, ConfidenceThresholds, EngineConfig, PhaseThresholds, ResolverPenalties,
    ScoreWeights,
};
pub use engine::{AssignmentPlan, ConsumedFields, MappingEngine, MappingOutcome};
pub use error::{ConfigError, SessionError};
pub use patterns::{DOMAIN_CONCEPTS, DomainConcept, domain_relevance, is_domain_term};
pub use resolve::{find_conflicts, is_consistent, validate};
pub use score::{ColumnScore, ScoreComponent, Scorer};
pub use state::MappingSession;
pub use summary::{count_by_level, summarize};
pub use utils::normalize_text;

use fieldmap_model::{SourceColumn, TargetField};

/// Runs the whole pipeline with the given configuration.
pub fn map_columns(
    columns: &[SourceColumn],
    fields: &[TargetField],
    config: &EngineConfig,
) -> MappingOutcome {
    MappingEngine::new(config.clone()).run(columns, fields)
}
