//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use clap::{Args, Parser};
use std::path::PathBuf;

use super::validators::validate_input_file;

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing tracelink.yaml
    ///
    /// The declaration file is kept if it already exists.
    #[arg(short, long)]
    pub force: bool,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Declaration files shared by every analysis command
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Declaration files (JSONL) to load instead of the configured inputs
    #[arg(value_name = "FILES", value_parser = validate_input_file)]
    pub files: Vec<PathBuf>,
}

/// Arguments for `analyze` and the single-section commands
#[derive(Parser, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Inputs
    #[command(flatten)]
    pub input: InputArgs,
}

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Inputs
    #[command(flatten)]
    pub input: InputArgs,

    /// Minimum coverage percent for every level pair
    ///
    /// Replaces `coverage.min-percent` from tracelink.yaml. Per-pair
    /// overrides from the config still apply.
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_coverage: Option<u8>,
}
