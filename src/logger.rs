//! Logging utilities with colored output and a dated log file.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, shown only with `--verbose`
//! - a file sink: once `init_file_log` has run, every line is also appended
//!   to `<dir>/rulebook.log.YYYYMMDD` with a timestamp
//!
//! # Example
//!
//! ```ignore
//! log!("fetch"; "fetching {} ({})", slug, kind);
//! debug!("resolve"; "rule subtype {} -> {}", id, path);
//! ```

use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    fs::{self, OpenOptions},
    io::{Write, stdout},
    path::{Path, PathBuf},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::utils::date::DateTimeUtc;

/// Base name of the dated log file.
const LOG_BASENAME: &str = "rulebook.log";

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Destination of the file sink, if enabled.
static LOG_FILE: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
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

/// Log a debug message (only shown when --verbose is enabled)
///
/// The line always reaches the log file.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::debug($module, &format!($($arg)*))
    }};
}

// ============================================================================
// File Sink
// ============================================================================

/// Dated log file path inside `dir`.
pub fn log_file_path(dir: &Path, date: DateTimeUtc) -> PathBuf {
    dir.join(format!("{LOG_BASENAME}.{}", date.to_compact_date()))
}

/// Enable the file sink. Creates `dir` when missing.
pub fn init_file_log(dir: &Path) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = log_file_path(dir, DateTimeUtc::now());
    *LOG_FILE.lock() = Some(path.clone());
    Ok(path)
}

/// Current log file, if the sink is enabled.
pub fn current_log_file() -> Option<PathBuf> {
    LOG_FILE.lock().clone()
}

/// Append one plain line to the log file. Failures are swallowed.
fn append_to_file(module: &str, message: &str) {
    let guard = LOG_FILE.lock();
    let Some(path) = guard.as_ref() else {
        return;
    };
    let stamp = DateTimeUtc::now().to_clock();
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        for line in message.lines() {
            writeln!(file, "[{stamp}][{module}] {}", line.trim_end()).ok();
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();

    append_to_file(module, message);
}

/// Debug line: terminal only when verbose, file always.
#[inline]
pub fn debug(module: &str, message: &str) {
    if is_verbose() {
        log(module, message);
    } else {
        append_to_file(module, message);
    }
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "fetch" | "build" => prefix.bright_blue().bold().to_string(),
        "write" | "rules-map" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        "warning" => prefix.bright_magenta().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_path_is_dated() {
        let date = DateTimeUtc::new(2024, 6, 15, 14, 30, 45);
        let path = log_file_path(Path::new("/tmp/logs"), date);
        assert_eq!(path, PathBuf::from("/tmp/logs/rulebook.log.20240615"));
    }

    #[test]
    fn test_colorize_prefix_contains_module() {
        let prefix = colorize_prefix("fetch", "fetch");
        assert!(prefix.contains("[fetch]"));
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
