//! Tracelink CLI binary.

use anyhow::Result;
use std::process::ExitCode;
use tracelink::cli::{Cli, CoverageGateFailed};
use tracing_subscriber::EnvFilter;

/// Main entry point for the tracelink CLI.
///
/// Uses tokio's `current_thread` runtime: all I/O happens up front and
/// resolution is synchronous.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=tracelink=debug,tracelink_jsonl=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tracelink=info,tracelink_jsonl=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting tracelink CLI");

    let cli = Cli::parse_args();
    if let Err(err) = cli.execute().await {
        if err.downcast_ref::<CoverageGateFailed>().is_some() {
            return Ok(ExitCode::from(CoverageGateFailed::EXIT_CODE));
        }
        return Err(err);
    }

    tracing::debug!("Tracelink CLI completed successfully");
    Ok(ExitCode::SUCCESS)
}
