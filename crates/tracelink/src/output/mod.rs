//! Output formatting for CLI commands.
//!
//! This module renders report rows in both human-readable text format and
//! JSON format for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, icons)
//! - `table`: Column-aligned text tables

pub mod color;
mod table;

use crate::ingest::{IngestReport, Rejection};
use crate::report::{
    CheckReport, CoverageRow, DanglingRow, MatrixRow, OrphanRow, RelatedRow, Report,
    matrix_headers,
};
use crate::resolver::{CoverageThresholds, TraceDirection};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};

use color::{bold, colorize_percent, colorize_status, dimmed, warning_icon};
use table::write_table;

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;
const FINGERPRINT_DISPLAY_LEN: usize = 12;

/// Configuration for output formatting.
///
/// This struct holds settings that control how output is formatted,
/// including terminal width limits, ASCII fallback mode, and color output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `TRACELINK_MAX_WIDTH`: Maximum content width (default: 100)
    /// - `TRACELINK_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `TRACELINK_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_width = match lookup("TRACELINK_MAX_WIDTH") {
            Some(s) if !s.is_empty() => match s.parse() {
                Ok(width) => width,
                Err(_) => {
                    tracing::warn!(
                        env_var = "TRACELINK_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match lookup("TRACELINK_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "TRACELINK_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // Respect NO_COLOR (https://no-color.org/), then TRACELINK_COLOR
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("TRACELINK_COLOR")
                .is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size().map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| {
        usize::from(w.0)
    })
}

fn content_width(config: &OutputConfig) -> usize {
    get_terminal_width().min(config.max_width)
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width)
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect()
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// JSON shape of `analyze`: the report plus skipped declarations.
#[derive(Serialize)]
struct AnalysisJson<'a> {
    #[serde(flatten)]
    report: &'a Report,
    rejections: &'a [Rejection],
}

/// Print the full analysis in the specified format
pub fn print_analysis(
    report: &Report,
    ingest: &IngestReport,
    thresholds: &CoverageThresholds,
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            write_analysis_text(&mut handle, report, ingest, thresholds, &config)
        }
        OutputMode::Json => write_json(
            &mut handle,
            &AnalysisJson {
                report,
                rejections: &ingest.rejections,
            },
        ),
    }
}

/// Print a traceability matrix in the specified format
pub fn print_matrix(rows: &[MatrixRow], direction: TraceDirection, mode: OutputMode) -> io::Result<()> {
    print_section(rows, mode, |w, config| {
        write_matrix_text(w, rows, direction, config)
    })
}

/// Print the coverage table in the specified format
pub fn print_coverage(
    rows: &[CoverageRow],
    thresholds: &CoverageThresholds,
    mode: OutputMode,
) -> io::Result<()> {
    print_section(rows, mode, |w, config| {
        write_coverage_text(w, rows, thresholds, config)
    })
}

/// Print the orphan list in the specified format
pub fn print_orphans(rows: &[OrphanRow], mode: OutputMode) -> io::Result<()> {
    print_section(rows, mode, |w, config| write_orphans_text(w, rows, config))
}

/// Print the dangling-link list in the specified format
pub fn print_dangling(rows: &[DanglingRow], mode: OutputMode) -> io::Result<()> {
    print_section(rows, mode, |w, config| write_dangling_text(w, rows, config))
}

/// Print the conflicts/duplicates list in the specified format
pub fn print_related(rows: &[RelatedRow], mode: OutputMode) -> io::Result<()> {
    print_section(rows, mode, |w, config| write_related_text(w, rows, config))
}

/// Print the coverage gate outcome in the specified format
pub fn print_check(check: &CheckReport, mode: OutputMode) -> io::Result<()> {
    print_section(check, mode, |w, config| write_check_text(w, check, config))
}

/// Print skipped declarations to stderr (text mode only).
pub fn print_rejections(ingest: &IngestReport) -> io::Result<()> {
    if ingest.rejections.is_empty() {
        return Ok(());
    }
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    write_rejections_text(&mut handle, &ingest.rejections, &OutputConfig::from_env())
}

fn print_section<T, F>(value: &T, mode: OutputMode, text: F) -> io::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&mut io::StdoutLock<'static>, &OutputConfig) -> io::Result<()>,
{
    let mut handle = io::stdout().lock();
    match mode {
        OutputMode::Text => text(&mut handle, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, value),
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(w, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn write_heading<W: Write>(w: &mut W, title: &str, config: &OutputConfig) -> io::Result<()> {
    writeln!(w, "{}", bold(&format!("{title}:"), config))
}

fn write_none<W: Write>(w: &mut W, config: &OutputConfig) -> io::Result<()> {
    writeln!(w, "  {}", dimmed("(none)", config))
}

fn write_analysis_text<W: Write>(
    w: &mut W,
    report: &Report,
    ingest: &IngestReport,
    thresholds: &CoverageThresholds,
    config: &OutputConfig,
) -> io::Result<()> {
    let short: String = report
        .fingerprint
        .chars()
        .take(FINGERPRINT_DISPLAY_LEN)
        .collect();
    writeln!(
        w,
        "Snapshot {} ({} artifacts, {} links)",
        info(&short, config),
        report.summary.artifacts,
        report.summary.links
    )?;

    writeln!(w)?;
    write_matrix_text(w, &report.forward, TraceDirection::Forward, config)?;
    writeln!(w)?;
    write_matrix_text(w, &report.backward, TraceDirection::Backward, config)?;
    writeln!(w)?;
    write_coverage_text(w, &report.coverage, thresholds, config)?;
    writeln!(w)?;
    write_orphans_text(w, &report.orphans, config)?;
    writeln!(w)?;
    write_dangling_text(w, &report.dangling, config)?;
    writeln!(w)?;
    write_related_text(w, &report.related, config)?;

    if !ingest.rejections.is_empty() {
        writeln!(w)?;
        write_rejections_text(w, &ingest.rejections, config)?;
    }

    let s = &report.summary;
    writeln!(w)?;
    writeln!(
        w,
        "Summary: {} complete, {} broken, {} orphaned, {} dangling, {} related",
        success(&s.complete_chains.to_string(), config),
        error(&s.broken_chains.to_string(), config),
        s.orphans,
        s.dangling,
        s.related
    )
}

fn write_matrix_text<W: Write>(
    w: &mut W,
    rows: &[MatrixRow],
    direction: TraceDirection,
    config: &OutputConfig,
) -> io::Result<()> {
    let title = match direction {
        TraceDirection::Forward => "Forward traceability",
        TraceDirection::Backward => "Backward traceability",
    };
    write_heading(w, title, config)?;
    if rows.is_empty() {
        return write_none(w, config);
    }

    let mut headers = matrix_headers();
    headers.push("Status");
    let status_col = headers.len() - 1;

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.cells()
                .iter()
                .map(|cell| cell.map_or_else(|| "-".to_string(), ToString::to_string))
                .chain(std::iter::once(row.chain_status.to_string()))
                .collect()
        })
        .collect();

    write_table(
        w,
        &headers,
        &cells,
        |row, col, text| {
            if col == status_col {
                colorize_status(rows[row].chain_status, text, config)
            } else if text.trim_end() == "-" {
                dimmed(text, config)
            } else {
                info(text, config)
            }
        },
        config,
    )
}

fn write_coverage_text<W: Write>(
    w: &mut W,
    rows: &[CoverageRow],
    thresholds: &CoverageThresholds,
    config: &OutputConfig,
) -> io::Result<()> {
    write_heading(w, "Coverage", config)?;
    if rows.is_empty() {
        return write_none(w, config);
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let detail = if row.is_degenerate {
                "no artifacts".to_string()
            } else {
                format!("{}/{}", row.covered, row.total)
            };
            vec![
                row.level_pair.clone(),
                format!("{}%", row.coverage_percent),
                detail,
            ]
        })
        .collect();

    write_table(
        w,
        &["Pair", "Coverage", "Covered"],
        &cells,
        |row, col, text| {
            let cov = &rows[row];
            if col == 1 {
                let required = thresholds.min_for(cov.upper);
                colorize_percent(text, cov.coverage_percent, required, cov.is_degenerate, config)
            } else if cov.is_degenerate {
                dimmed(text, config)
            } else {
                text.to_string()
            }
        },
        config,
    )
}

fn write_orphans_text<W: Write>(w: &mut W, rows: &[OrphanRow], config: &OutputConfig) -> io::Result<()> {
    write_heading(w, "Orphans", config)?;
    if rows.is_empty() {
        return write_none(w, config);
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| vec![row.artifact_id.to_string(), row.kind.to_string()])
        .collect();
    write_table(
        w,
        &["Artifact", "Kind"],
        &cells,
        |_, col, text| if col == 0 { warning(text, config) } else { text.to_string() },
        config,
    )
}

fn write_dangling_text<W: Write>(
    w: &mut W,
    rows: &[DanglingRow],
    config: &OutputConfig,
) -> io::Result<()> {
    write_heading(w, "Dangling links", config)?;
    if rows.is_empty() {
        return write_none(w, config);
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.source.to_string(),
                row.link_type.to_string(),
                row.target.to_string(),
                row.missing_side.to_string(),
            ]
        })
        .collect();
    write_table(
        w,
        &["Source", "Type", "Target", "Missing"],
        &cells,
        |_, col, text| if col == 3 { error(text, config) } else { text.to_string() },
        config,
    )
}

fn write_related_text<W: Write>(w: &mut W, rows: &[RelatedRow], config: &OutputConfig) -> io::Result<()> {
    write_heading(w, "Conflicts and duplicates", config)?;
    if rows.is_empty() {
        return write_none(w, config);
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.first.to_string(),
                row.link_type.to_string(),
                row.second.to_string(),
            ]
        })
        .collect();
    write_table(
        w,
        &["First", "Type", "Second"],
        &cells,
        |_, col, text| if col == 1 { text.to_string() } else { info(text, config) },
        config,
    )
}

fn write_check_text<W: Write>(w: &mut W, check: &CheckReport, config: &OutputConfig) -> io::Result<()> {
    write_coverage_text(w, &check.coverage, &check.thresholds, config)?;
    writeln!(w)?;

    if check.passed {
        return writeln!(w, "{}", success("Coverage check passed", config));
    }

    writeln!(
        w,
        "{}",
        error(
            &format!("Coverage check failed for {} level pair(s):", check.failures.len()),
            config
        )
    )?;
    for failure in &check.failures {
        writeln!(
            w,
            "  {}: {}% < {}%",
            failure.level_pair, failure.coverage_percent, failure.required_percent
        )?;
    }
    Ok(())
}

fn write_rejections_text<W: Write>(
    w: &mut W,
    rejections: &[Rejection],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        warning(warning_icon(config), config),
        warning(
            &format!("{} declaration(s) skipped:", rejections.len()),
            config
        )
    )?;
    let width = content_width(config).saturating_sub(4).max(20);
    for rejection in rejections {
        let mut lines = wrap_text(&rejection.to_string(), width).into_iter();
        if let Some(first) = lines.next() {
            writeln!(w, "  - {first}")?;
        }
        for line in lines {
            writeln!(w, "    {line}")?;
        }
    }
    Ok(())
}
