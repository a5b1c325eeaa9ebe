//! Steps shared by the `map` and `explain` commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fieldmap_engine::{ColumnScore, EngineConfig, MappingEngine, MappingOutcome, Scorer};
use fieldmap_model::{SourceColumn, TargetField};
use tracing::{info, info_span};

use crate::input::{load_columns, load_fields};

/// Built-in starting configurations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Default,
    Strict,
    Relaxed,
}

impl Preset {
    pub fn config(self) -> EngineConfig {
        match self {
            Preset::Default => EngineConfig::default(),
            Preset::Strict => EngineConfig::strict(),
            Preset::Relaxed => EngineConfig::relaxed(),
        }
    }
}

/// A config file, when given, replaces the preset entirely.
pub fn resolve_config(preset: Preset, config_path: Option<&Path>) -> Result<EngineConfig> {
    match config_path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("load engine config {}", path.display())),
        None => Ok(preset.config()),
    }
}

/// Loads both inputs and runs the engine over them.
pub fn map_files(
    columns_path: &Path,
    fields_path: &Path,
    config: &EngineConfig,
) -> Result<MappingOutcome> {
    let span = info_span!("map", columns = %columns_path.display());
    let _guard = span.enter();
    let columns = load_columns(columns_path)?;
    let fields = load_fields(fields_path)?;
    info!(
        columns = columns.len(),
        fields = fields.len(),
        "loaded mapping inputs"
    );
    let engine = MappingEngine::new(config.clone());
    Ok(engine.run(&columns, &fields))
}

/// Scores one pair with the weights of `config`.
pub fn explain_pair(
    column: &SourceColumn,
    field: &TargetField,
    config: &EngineConfig,
) -> ColumnScore {
    Scorer::new(config.weights).score_detailed(column, field)
}

/// Writes the outcome as pretty-printed JSON.
pub fn write_outcome(path: &Path, outcome: &MappingOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("serialize mapping outcome")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "wrote mapping outcome");
    Ok(())
}
