use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown column type: {0}")]
    UnknownColumnType(String),
    #[error("unknown field category: {0}")]
    UnknownCategory(String),
    #[error("unknown match kind: {0}")]
    UnknownMatchKind(String),
    #[error("duplicate {kind} name '{name}' (names compare case-insensitively)")]
    DuplicateName { kind: &'static str, name: String },
    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },
}

pub type Result<T> = std::result::Result<T, ModelError>;
