//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Map uploaded table columns onto destination schema fields",
    long_about = "Map the columns of an uploaded table onto the fields of a destination schema.\n\n\
                  Columns and fields are read from JSON arrays; every column receives a target \
                  field (or an explicit none) with a confidence and a rationale."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Map source columns onto target fields and print the result.
    Map(MapArgs),

    /// Score a single column-field pair and explain the score.
    Explain(ExplainArgs),
}

#[derive(Parser)]
pub struct MapArgs {
    /// JSON array of source columns ({"name", "inferred_type"?, "sample_values"?}).
    #[arg(long = "columns", value_name = "JSON")]
    pub columns: PathBuf,

    /// JSON array of target fields ({"name", "type"?, "category"?, "domain_relevance"?}).
    #[arg(long = "fields", value_name = "JSON")]
    pub fields: PathBuf,

    /// TOML file overriding engine weights and thresholds.
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Built-in weights and thresholds to use when no --config is given.
    #[arg(
        long = "preset",
        value_enum,
        default_value = "default",
        conflicts_with = "config"
    )]
    pub preset: PresetArg,

    /// Also write the full result as JSON to this path.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// How to print the result on stdout.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct ExplainArgs {
    /// Source column name.
    #[arg(value_name = "COLUMN")]
    pub column: String,

    /// Target field name.
    #[arg(value_name = "FIELD")]
    pub field: String,

    /// Inferred type of the column (numeric, text, time, date, ...).
    #[arg(long = "column-type", value_name = "TYPE", default_value = "text")]
    pub column_type: String,

    /// Type of the field.
    #[arg(long = "field-type", value_name = "TYPE", default_value = "text")]
    pub field_type: String,

    /// Domain relevance of the field (0-10); computed from its name when omitted.
    #[arg(long = "relevance", value_name = "SCORE")]
    pub relevance: Option<f64>,

    /// TOML file overriding engine weights and thresholds.
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Built-in weights and thresholds to use when no --config is given.
    #[arg(
        long = "preset",
        value_enum,
        default_value = "default",
        conflicts_with = "config"
    )]
    pub preset: PresetArg,

    /// How to print the explanation.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    Default,
    Strict,
    Relaxed,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
