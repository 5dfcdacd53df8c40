//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::Result;

use super::args::{AnalyzeArgs, CheckArgs, InitArgs, InputArgs};
use super::types::{CoverageGateFailed, Section};
use crate::app::App;
use crate::ingest::IngestReport;
use crate::output::{self, OutputMode};
use crate::report::{format_check, format_report};
use crate::resolver::{Resolution, TraceDirection, resolve};

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;
    let result = init::init(&current_dir, args.force).await?;

    if !args.quiet {
        let verb = if result.overwrote_config {
            "Reinitialized"
        } else {
            "Initialized"
        };
        println!("{verb} tracelink in {}", current_dir.display());
        println!("  Config: {}", result.config_file.display());
        if result.created_input {
            println!("  Declarations: {}", result.input_file.display());
        } else {
            println!("  Declarations: {} (kept)", result.input_file.display());
        }
    }

    Ok(())
}

/// Load the inputs and resolve them.
async fn load_and_resolve(app: &App, input: &InputArgs) -> Result<(Resolution, IngestReport)> {
    let (snapshot, ingest) = app.load_snapshot(&input.files).await?;
    let resolution = resolve(&snapshot);
    tracing::debug!(fingerprint = %resolution.fingerprint, "Resolved snapshot");
    Ok((resolution, ingest))
}

/// Execute the analyze command
pub async fn execute_analyze(app: &App, args: &AnalyzeArgs, output_mode: OutputMode) -> Result<()> {
    let (resolution, ingest) = load_and_resolve(app, &args.input).await?;
    let report = format_report(&resolution);
    output::print_analysis(&report, &ingest, &app.config().coverage, output_mode)?;
    Ok(())
}

/// Execute one of the single-section commands
pub async fn execute_section(
    app: &App,
    section: Section,
    args: &AnalyzeArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let (resolution, ingest) = load_and_resolve(app, &args.input).await?;
    if output_mode == OutputMode::Text {
        output::print_rejections(&ingest)?;
    }

    let report = format_report(&resolution);
    tracing::debug!(%section, "Printing section");
    match section {
        Section::Forward => output::print_matrix(&report.forward, TraceDirection::Forward, output_mode)?,
        Section::Backward => {
            output::print_matrix(&report.backward, TraceDirection::Backward, output_mode)?;
        }
        Section::Coverage => {
            output::print_coverage(&report.coverage, &app.config().coverage, output_mode)?;
        }
        Section::Orphans => output::print_orphans(&report.orphans, output_mode)?,
        Section::Dangling => output::print_dangling(&report.dangling, output_mode)?,
        Section::Related => output::print_related(&report.related, output_mode)?,
    }
    Ok(())
}

/// Execute the check command
///
/// # Errors
///
/// Returns [`CoverageGateFailed`] when any level pair is below its minimum,
/// after printing the outcome.
pub async fn execute_check(app: &App, args: &CheckArgs, output_mode: OutputMode) -> Result<()> {
    let (resolution, ingest) = load_and_resolve(app, &args.input).await?;
    if output_mode == OutputMode::Text {
        output::print_rejections(&ingest)?;
    }

    let mut thresholds = app.config().coverage.clone();
    if let Some(min) = args.min_coverage {
        thresholds.min_percent = min;
    }

    let check = format_check(&resolution, &thresholds);
    output::print_check(&check, output_mode)?;

    if check.passed {
        Ok(())
    } else {
        tracing::info!(failures = check.failures.len(), "Coverage check failed");
        Err(CoverageGateFailed {
            failures: check.failures.len(),
        }
        .into())
    }
}
