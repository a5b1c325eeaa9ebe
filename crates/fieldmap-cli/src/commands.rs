use anyhow::{Context, Result, bail};
use fieldmap_cli::pipeline::{Preset, explain_pair, map_files, resolve_config, write_outcome};
use fieldmap_cli::report::{explain_table, print_outcome};
use fieldmap_engine::domain_relevance;
use fieldmap_model::{ColumnType, SourceColumn, TargetField};
use tracing::info;

use crate::cli::{ExplainArgs, MapArgs, OutputFormatArg, PresetArg};

fn preset(arg: PresetArg) -> Preset {
    match arg {
        PresetArg::Default => Preset::Default,
        PresetArg::Strict => Preset::Strict,
        PresetArg::Relaxed => Preset::Relaxed,
    }
}

pub fn run_map(args: &MapArgs) -> Result<()> {
    let config = resolve_config(preset(args.preset), args.config.as_deref())?;
    let outcome = map_files(&args.columns, &args.fields, &config)?;
    if let Some(path) = &args.output {
        write_outcome(path, &outcome)?;
    }
    match args.format {
        OutputFormatArg::Table => print_outcome(&outcome, &config.confidence),
        OutputFormatArg::Json => {
            let json =
                serde_json::to_string_pretty(&outcome).context("serialize mapping outcome")?;
            println!("{json}");
        }
    }
    info!(
        mapped = outcome.summary.mapped,
        unmapped = outcome.summary.unmapped,
        unresolved = outcome.summary.unresolved_conflicts,
        "mapping complete"
    );
    Ok(())
}

pub fn run_explain(args: &ExplainArgs) -> Result<()> {
    let column_type: ColumnType = args
        .column_type
        .parse()
        .with_context(|| format!("parse --column-type {}", args.column_type))?;
    let field_type: ColumnType = args
        .field_type
        .parse()
        .with_context(|| format!("parse --field-type {}", args.field_type))?;
    let relevance = args
        .relevance
        .unwrap_or_else(|| domain_relevance(&args.field));
    if !(0.0..=10.0).contains(&relevance) {
        bail!("--relevance must be between 0 and 10, got {relevance}");
    }
    let column = SourceColumn::new(args.column.as_str(), column_type);
    let field = TargetField::new(args.field.as_str(), field_type).with_relevance(relevance);
    let config = resolve_config(preset(args.preset), args.config.as_deref())?;
    let score = explain_pair(&column, &field, &config);
    match args.format {
        OutputFormatArg::Table => {
            println!("{} -> {}: {}", column.name, field.name, score.rationale);
            println!("{}", explain_table(&score));
        }
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&score).context("serialize score")?;
            println!("{json}");
        }
    }
    Ok(())
}
