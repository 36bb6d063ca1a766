//! Command-line argument definitions.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Routing table, per-plugin results, and findings
    Full,
    /// Findings only
    Summary,
    /// Machine-readable JSON
    Json,
}

/// Plugin-routed document analysis with ensemble extraction and dedup
#[derive(Debug, Parser)]
#[command(name = "redline", version)]
pub struct Cli {
    /// Document file to analyze
    pub document: PathBuf,

    /// Explicit config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ignore all config files and use built-in defaults
    #[arg(long)]
    pub no_config: bool,

    /// Run the extraction ensemble instead of the plugin pipeline
    #[arg(long)]
    pub ensemble: bool,

    /// Extractor model for the ensemble (repeatable); overrides config
    #[arg(long = "extractor", value_name = "MODEL")]
    pub extractors: Vec<String>,

    /// Arbitrate deduplicated candidates with a judge pass
    #[arg(long)]
    pub judge: bool,

    /// Dedup similarity threshold override (0, 1]
    #[arg(long, value_name = "FRACTION")]
    pub threshold: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputMode::Full)]
    pub output: OutputMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Write tracing output to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
