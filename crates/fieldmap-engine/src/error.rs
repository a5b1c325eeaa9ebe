//! Error types for configuration loading and interactive editing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or checking an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A weight or threshold lies outside its allowed range.
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Two settings contradict each other.
    #[error("inconsistent config: {0}")]
    Inconsistent(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from manual edits in a [`MappingSession`](crate::MappingSession).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("source column not found: {0}")]
    ColumnNotFound(String),
    #[error("target field not found: {0}")]
    FieldNotFound(String),
}
