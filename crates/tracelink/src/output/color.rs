//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success/Complete: green  (complete chains, coverage at or above the gate)
//!   - Warning:          yellow (coverage below 100%, rejected declarations)
//!   - Error/Broken:     red    (broken chains, failed gate, dangling links)
//!   - Info/Reference:   cyan   (artifact IDs)
//!   - Muted:            dimmed (empty cells, degenerate pairs)
//!   - Emphasis:         bold   (section headers)

use crate::resolver::ChainStatus;
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Icon for a chain status, with ASCII fallback.
pub(crate) fn status_icon(status: ChainStatus, config: &OutputConfig) -> &'static str {
    match (status.is_complete(), config.use_ascii) {
        (true, false) => "✓",
        (true, true) => "+",
        (false, false) => "✗",
        (false, true) => "x",
    }
}

/// Status cell text: icon and status, colored by outcome.
///
/// `text` is the already padded status string so alignment survives the
/// escape codes.
pub(crate) fn colorize_status(status: ChainStatus, text: &str, config: &OutputConfig) -> String {
    let cell = format!("{} {text}", status_icon(status, config));
    if status.is_complete() {
        success(&cell, config)
    } else {
        error(&cell, config)
    }
}

/// Coverage percentage colored against the required minimum.
pub(crate) fn colorize_percent(
    text: &str,
    percent: u8,
    required: u8,
    degenerate: bool,
    config: &OutputConfig,
) -> String {
    if degenerate {
        dimmed(text, config)
    } else if percent < required {
        error(text, config)
    } else if percent < 100 {
        warning(text, config)
    } else {
        success(text, config)
    }
}

/// Warning marker, with ASCII fallback.
pub(crate) fn warning_icon(config: &OutputConfig) -> &'static str {
    if config.use_ascii { "!" } else { "⚠" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::control::set_override;
    use std::sync::{Mutex, MutexGuard};

    // colored's override is process-global
    static COLOR_MUTEX: Mutex<()> = Mutex::new(());

    struct ColorGuard<'a> {
        _guard: MutexGuard<'a, ()>,
    }

    impl ColorGuard<'_> {
        fn new() -> Self {
            let guard = COLOR_MUTEX
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            set_override(true);
            Self { _guard: guard }
        }
    }

    impl Drop for ColorGuard<'_> {
        fn drop(&mut self) {
            set_override(false);
        }
    }

    fn plain() -> OutputConfig {
        OutputConfig::new(80, false, false)
    }

    #[test]
    fn test_semantic_colors_with_colors_enabled() {
        let _guard = ColorGuard::new();
        let config = OutputConfig::new(80, false, true);

        assert!(success("ok", &config).contains("\x1b["));
        assert!(error("bad", &config).contains("\x1b["));
        assert!(warning("hmm", &config).contains("\x1b["));
        assert!(info("REQ-1", &config).contains("\x1b["));
    }

    #[test]
    fn test_semantic_colors_without_colors() {
        let config = plain();

        assert_eq!(success("ok", &config), "ok");
        assert_eq!(error("bad", &config), "bad");
        assert_eq!(warning("hmm", &config), "hmm");
        assert_eq!(info("REQ-1", &config), "REQ-1");
        assert_eq!(bold("Coverage", &config), "Coverage");
        assert_eq!(dimmed("-", &config), "-");
    }

    #[test]
    fn test_ascii_fallback_icons() {
        let unicode = plain();
        let ascii = OutputConfig::new(80, true, false);

        assert_eq!(status_icon(ChainStatus::Complete, &unicode), "✓");
        assert_eq!(status_icon(ChainStatus::Complete, &ascii), "+");
        assert_eq!(status_icon(ChainStatus::BrokenAtLevel(4), &unicode), "✗");
        assert_eq!(status_icon(ChainStatus::BrokenAtLevel(4), &ascii), "x");
        assert_eq!(warning_icon(&ascii), "!");
    }

    #[test]
    fn test_colorize_status_without_colors() {
        let ascii = OutputConfig::new(80, true, false);
        assert_eq!(
            colorize_status(ChainStatus::BrokenAtLevel(4), "BrokenAtLevel-4", &ascii),
            "x BrokenAtLevel-4"
        );
    }

    #[test]
    fn test_colorize_percent_without_colors_is_identity() {
        assert_eq!(colorize_percent("67%", 67, 80, false, &plain()), "67%");
    }
}
