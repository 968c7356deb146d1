//! # Output Configuration
//!
//! This module decides whether the per-run report is styled and provides the
//! styling helpers used by the orchestrator.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;

use console::{style, Color};

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether styled output should be produced.
    pub use_color: bool,
}

/// The visual role of a piece of report text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Root,
    Server,
    Org,
    Failure,
    Changed,
    Success,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// In auto mode, colors are disabled if `NO_COLOR` is set, `CLICOLOR=0`,
    /// `TERM=dumb`, or stdout is not a TTY (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Styles `text` for `tone`, or returns it untouched when colors are off.
    ///
    /// Pad before painting; escape codes would otherwise count toward the
    /// field width.
    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let styled = style(text).force_styling(true);
        let styled = match tone {
            Tone::Root => styled.fg(Color::Black).bg(Color::White),
            Tone::Server => styled.fg(Color::Black).bg(Color::Yellow),
            Tone::Org => styled.fg(Color::Black).bg(Color::Cyan),
            Tone::Failure => styled.red(),
            Tone::Changed => styled.blue(),
            Tone::Success => styled.green(),
        };
        styled.to_string()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Leading spaces for a tree depth.
pub fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
