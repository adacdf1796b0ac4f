//! Consolidated styling module for terminal output.
//!
//! This module uses the anstyle ecosystem:
//! - anstream for auto-detecting color support
//! - anstyle for composable styling
//! - color-print `cformat!` for user-facing messages

use std::fmt;

use anstyle::{AnsiColor, Color, Style};
use color_print::cformat;
use unicode_width::UnicodeWidthStr;

// ============================================================================
// Re-exports from anstream (auto-detecting output)
// ============================================================================

/// Auto-detecting println that respects NO_COLOR, CLICOLOR_FORCE, and terminal capabilities
pub use anstream::println;

/// Auto-detecting eprintln that respects NO_COLOR, CLICOLOR_FORCE, and terminal capabilities
pub use anstream::eprintln;

// ============================================================================
// Programmatic Style Constants (for StyledLine and table rendering)
// ============================================================================

/// Branch names in tables
pub const BRANCH: Style = Style::new().bold();

/// Secondary columns (paths, projects)
pub const DIM: Style = Style::new().dimmed();

/// Dirty marker in tables (yellow)
pub const DIRTY: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));

/// Tag list in tables (cyan)
pub const TAGS: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

// ============================================================================
// Message Symbols
// ============================================================================

pub const SUCCESS_SYMBOL: &str = "✓";
pub const ERROR_SYMBOL: &str = "✗";
pub const WARNING_SYMBOL: &str = "▲";
pub const HINT_SYMBOL: &str = "↳";
pub const INFO_SYMBOL: &str = "○";
pub const PROMPT_SYMBOL: &str = "❯";

// ============================================================================
// Formatted Message Type
// ============================================================================

/// A message that has already been formatted with a symbol and styling.
///
/// Message functions take `impl AsRef<str>` and return `FormattedMessage`.
/// Since `FormattedMessage` does NOT implement `AsRef<str>`, passing it back
/// into a message function is a compile error.
#[derive(Debug, Clone)]
pub struct FormattedMessage(String);

impl FormattedMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn error_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("<red>{ERROR_SYMBOL} {}</>", content.as_ref()))
}

pub fn hint_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("<dim>{HINT_SYMBOL} {}</>", content.as_ref()))
}

pub fn warning_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("<yellow>{WARNING_SYMBOL} {}</>", content.as_ref()))
}

pub fn success_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("<green>{SUCCESS_SYMBOL} {}</>", content.as_ref()))
}

/// Neutral status, no color
pub fn info_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("{INFO_SYMBOL} {}", content.as_ref()))
}

/// Indent quoted content (git stderr, file lists) under a message.
pub fn format_with_gutter(content: &str) -> String {
    content
        .lines()
        .map(|line| cformat!("<dim>│</> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Styled Output Types
// ============================================================================

/// A piece of text with an optional style
#[derive(Clone, Debug)]
pub struct StyledString {
    pub text: String,
    pub style: Option<Style>,
}

impl StyledString {
    pub fn new(text: impl Into<String>, style: Option<Style>) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self::new(text, Some(style))
    }

    /// Returns the visual width (unicode-aware, no ANSI codes)
    pub fn width(&self) -> usize {
        self.text.width()
    }

    /// Renders to a string with ANSI escape codes
    pub fn render(&self) -> String {
        if let Some(style) = &self.style {
            format!("{}{}{}", style.render(), self.text, style.render_reset())
        } else {
            self.text.clone()
        }
    }
}

/// A line composed of multiple styled strings
#[derive(Clone, Debug, Default)]
pub struct StyledLine {
    pub segments: Vec<StyledString>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_raw(&mut self, text: impl Into<String>) {
        self.segments.push(StyledString::raw(text));
    }

    pub fn push_styled(&mut self, text: impl Into<String>, style: Style) {
        self.segments.push(StyledString::styled(text, style));
    }

    /// Pad with spaces to reach a specific width
    pub fn pad_to(&mut self, target_width: usize) {
        let current_width = self.width();
        if current_width < target_width {
            self.push_raw(" ".repeat(target_width - current_width));
        }
    }

    /// Returns the total visual width
    pub fn width(&self) -> usize {
        self.segments.iter().map(|s| s.width()).sum()
    }

    /// Renders the entire line with ANSI escape codes
    pub fn render(&self) -> String {
        self.segments.iter().map(|s| s.render()).collect()
    }

    /// Renders without any escape codes
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}
