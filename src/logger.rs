//! Logging utilities with colored output and a render progress bar.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `ProgressBar` for the sequential render stage
//! - a process-wide quiet switch (`--quiet`) that keeps only errors
//!
//! # Example
//!
//! ```ignore
//! // Simple logging
//! log!("build"; "rendering {} pages", count);
//!
//! // Progress while pages are written one after another
//! let progress = ProgressBar::new("render", pages.len());
//! progress.inc();
//! progress.finish();
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{IsTerminal, Write, stdout},
    sync::{
        OnceLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Whether a progress bar currently owns the last terminal line
static BAR_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Suppress everything except `[error]` lines
static QUIET: AtomicBool = AtomicBool::new(false);

// ============================================================================
// Layout Constants
// ============================================================================
//
// Progress bar format: "[module] [████░░░░] 42/100"
//                       ^------^ ^-------^ ^----^
//                       prefix   bar       count

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;
/// Bar wrapper: " []" (space + brackets around progress bar)
const BAR_WRAPPER_LEN: usize = 3;
/// Space before count: "...] 42/100" <- this space
const SPACE_BEFORE_COUNT: usize = 1;
/// Minimum progress bar width in characters
const MIN_BAR_WIDTH: usize = 10;
/// Maximum progress bar width in characters
const MAX_BAR_WIDTH: usize = 40;

/// Calculate total prefix length for a module name.
///
/// Returns: `module.len() + 3` (for `[`, `]`, and trailing space)
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

/// Turn quiet mode on or off for the whole process.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Check whether quiet mode is on.
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

// ============================================================================
// Progress Bar
// ============================================================================

/// Single-line progress bar drawn below the log output.
///
/// Pages render strictly one after another, so one bar is enough.
/// Nothing is drawn when stdout is not a terminal or quiet mode is on.
pub struct ProgressBar {
    /// Colored prefix string (e.g., "[render]" in blue)
    prefix: ColoredString,
    /// Pre-calculated display length of prefix
    prefix_len: usize,
    /// Total number of items to process
    total: usize,
    /// Current progress counter
    current: AtomicUsize,
    /// Whether the bar is drawn at all
    visible: bool,
}

impl ProgressBar {
    /// Create a progress bar for `total` items under the given module name.
    pub fn new(module: &'static str, total: usize) -> Self {
        let visible = total > 1 && !is_quiet() && stdout().is_terminal();
        if visible {
            let mut stdout = stdout().lock();
            writeln!(stdout).ok();
            stdout.flush().ok();
            BAR_ACTIVE.store(true, Ordering::SeqCst);
        }

        Self {
            prefix: colorize_prefix(module, &module.to_ascii_lowercase()),
            prefix_len: calc_prefix_len(module.len()),
            total,
            current: AtomicUsize::new(0),
            visible,
        }
    }

    /// Advance the bar by one item.
    pub fn inc(&self) {
        let current = self.current.fetch_add(1, Ordering::Relaxed) + 1;
        if self.visible {
            self.display(current);
        }
    }

    /// Number of items counted so far.
    pub fn position(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    /// Render the bar on the reserved last line.
    fn display(&self, current: usize) {
        let width = get_terminal_width() as usize;

        let progress_text = format!("{}/{}", current, self.total);
        let overhead =
            self.prefix_len + BAR_WRAPPER_LEN + SPACE_BEFORE_COUNT + progress_text.len();
        let bar_width = width.saturating_sub(overhead).clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);

        let filled = if self.total > 0 {
            (current.min(self.total) * bar_width) / self.total
        } else {
            0
        };
        let empty = bar_width.saturating_sub(filled);
        let bar: String = "█".repeat(filled) + &"░".repeat(empty);

        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(1)).ok();
        execute!(stdout, Clear(ClearType::CurrentLine)).ok();
        write!(stdout, "{} [{}] {}", self.prefix, bar, progress_text).ok();
        execute!(stdout, cursor::MoveDown(1)).ok();
        write!(stdout, "\r").ok();
        stdout.flush().ok();
    }

    /// Clear the bar from the terminal.
    pub fn finish(&self) {
        if !self.visible || !BAR_ACTIVE.swap(false, Ordering::SeqCst) {
            return;
        }
        let mut stdout = stdout().lock();
        execute!(stdout, cursor::MoveUp(1)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        stdout.flush().ok();
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        self.finish();
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// Automatically truncates long single-line messages to fit terminal width.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    if is_quiet() && module_lower != "error" {
        return;
    }
    let prefix = colorize_prefix(module, &module_lower);
    let width = get_terminal_width() as usize;

    let mut stdout = stdout().lock();

    let bar_active = BAR_ACTIVE.load(Ordering::SeqCst);
    if bar_active {
        execute!(stdout, cursor::MoveUp(1)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    }

    if message.contains('\n') {
        writeln!(stdout, "{prefix} {message}").ok();
    } else {
        let max_msg_len = width.saturating_sub(calc_prefix_len(module.len()));
        writeln!(stdout, "{prefix} {}", truncate_str(message, max_msg_len)).ok();
    }

    if bar_active {
        writeln!(stdout).ok();
    }

    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "render" => prefix.bright_blue().bold(),
        "done" => prefix.bright_green().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within `max_len` bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_prefix_len_typical_module() {
        // "render" -> "[render] " = 6 + 2 + 1 = 9
        assert_eq!(calc_prefix_len(6), 9);
    }

    #[test]
    fn test_calc_prefix_len_empty() {
        assert_eq!(calc_prefix_len(0), 3);
    }

    #[test]
    fn test_truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_str_needs_truncation() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "€" is 3 bytes; cutting at 4 must back off to 3
        assert_eq!(truncate_str("€€", 4), "€");
    }

    #[test]
    fn test_truncate_str_zero_limit() {
        assert_eq!(truncate_str("hello", 0), "");
    }

    #[test]
    fn test_bar_width_constraints() {
        assert!(MIN_BAR_WIDTH < MAX_BAR_WIDTH);
    }

    #[test]
    fn test_progress_bar_counts_without_terminal() {
        // Under the test harness stdout is captured, so nothing is drawn.
        let progress = ProgressBar::new("render", 3);
        progress.inc();
        progress.inc();
        assert_eq!(progress.position(), 2);
        progress.finish();
    }

    #[test]
    fn test_colorize_prefix_contains_module() {
        let prefix = colorize_prefix("render", "render");
        assert!(prefix.to_string().contains("[render]"));
    }
}
