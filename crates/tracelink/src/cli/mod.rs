//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for tracelink using clap's derive API.
//! Each command has its own argument struct with validation and helpful error messages.
//!
//! # Commands
//!
//! - `init`: Write a starter `tracelink.yaml`
//! - `analyze`: Print the full traceability report
//! - `forward` / `backward`: Print one traceability matrix
//! - `coverage`: Print per-level coverage
//! - `orphans`, `dangling`, `related`: Print one finding list
//! - `check`: Fail with exit status 2 when coverage is below the gate
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--config <PATH>`: Use this config file instead of searching for one
//!
//! # Example
//!
//! ```bash
//! tracelink init
//! tracelink analyze
//! tracelink --json coverage trace/artifacts.jsonl trace/links.jsonl
//! tracelink check --min-coverage 80
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub use args::{AnalyzeArgs, CheckArgs, InitArgs, InputArgs};
pub use types::{CoverageGateFailed, Section};
pub use validators::validate_input_file;

use crate::app::App;
use crate::error::{ConfigError, Error};

/// Tracelink - traceability analysis for requirements, design, code and tests
///
/// Loads artifact and link declarations from JSONL files and reports
/// traceability chains, coverage, orphans and broken links.
#[derive(Parser, Debug)]
#[command(name = "tracelink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to tracelink.yaml (default: search up from the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default tracelink.yaml in the current directory
    ///
    /// Also creates an empty `trace.jsonl` declaration file if none exists.
    Init(InitArgs),

    /// Print the full report
    ///
    /// Summary, forward and backward matrices, coverage, orphans, dangling
    /// links and conflicts/duplicates.
    Analyze(AnalyzeArgs),

    /// Print the forward matrix (business needs down to test cases)
    Forward(AnalyzeArgs),

    /// Print the backward matrix (test cases up to business needs)
    Backward(AnalyzeArgs),

    /// Print coverage for each adjacent level pair
    Coverage(AnalyzeArgs),

    /// Print artifacts with no hierarchical links
    Orphans(AnalyzeArgs),

    /// Print links that reference undeclared artifacts
    Dangling(AnalyzeArgs),

    /// Print Conflicts and Duplicates pairs
    Related(AnalyzeArgs),

    /// Check coverage against the configured minimums
    ///
    /// Exits with status 2 when any level pair is below its minimum.
    /// Level pairs with no artifacts never fail.
    Check(CheckArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            Some(Commands::Analyze(args)) => {
                let app = self.load_app(&args.input.files).await?;
                execute::execute_analyze(&app, args, output_mode).await
            }
            Some(Commands::Forward(args)) => {
                self.run_section(Section::Forward, args, output_mode).await
            }
            Some(Commands::Backward(args)) => {
                self.run_section(Section::Backward, args, output_mode).await
            }
            Some(Commands::Coverage(args)) => {
                self.run_section(Section::Coverage, args, output_mode).await
            }
            Some(Commands::Orphans(args)) => {
                self.run_section(Section::Orphans, args, output_mode).await
            }
            Some(Commands::Dangling(args)) => {
                self.run_section(Section::Dangling, args, output_mode).await
            }
            Some(Commands::Related(args)) => {
                self.run_section(Section::Related, args, output_mode).await
            }
            Some(Commands::Check(args)) => {
                let app = self.load_app(&args.input.files).await?;
                execute::execute_check(&app, args, output_mode).await
            }
            None => {
                println!("Tracelink traceability analyzer");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }

    async fn run_section(
        &self,
        section: Section,
        args: &AnalyzeArgs,
        output_mode: crate::output::OutputMode,
    ) -> Result<()> {
        let app = self.load_app(&args.input.files).await?;
        execute::execute_section(&app, section, args, output_mode).await
    }

    /// Build the application context for an analysis command.
    ///
    /// `--config` wins; otherwise `tracelink.yaml` is searched for upwards.
    /// When none is found but input files were given, defaults are used.
    async fn load_app(&self, files: &[PathBuf]) -> Result<App> {
        let current_dir = std::env::current_dir()?;
        Ok(resolve_app(self.config.as_deref(), &current_dir, files).await?)
    }
}

async fn resolve_app(
    config: Option<&Path>,
    current_dir: &Path,
    files: &[PathBuf],
) -> crate::error::Result<App> {
    if let Some(path) = config {
        return App::from_config_file(path).await;
    }

    match App::from_directory(current_dir).await {
        Err(Error::Config(ConfigError::NotFound(_))) if !files.is_empty() => {
            tracing::debug!("No tracelink.yaml found, using default settings");
            Ok(App::with_defaults(current_dir))
        }
        other => other,
    }
}
