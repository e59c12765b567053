//! Logging for Vertex Forge
//!
//! Entries flow from the `forge_*!` macros through `Runtime::log` to the
//! installed `Logger`. `DefaultLogger` writes colored lines to stderr.
//! Only `forge_error!` records the file and line of the call site.

use std::fmt::Display;
use std::time::SystemTime;
use colored::*;
use chrono::{DateTime, Local};

/// Sink for log entries
///
/// # Example
///
/// ```no_run
/// use vertex_forge::forge::log::{Logger, LogEntry};
///
/// struct StderrSourceLogger;
///
/// impl Logger for StderrSourceLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}: {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One log record
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component, e.g. `forge::VertexArray` or `forge::headless`
    pub source: String,
    pub message: String,
    /// Call site file (ERROR entries only)
    pub file: Option<&'static str>,
    /// Call site line (ERROR entries only)
    pub line: Option<u32>,
}

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-call driver chatter
    Trace,
    /// Resource creation, slot assignment, storage growth
    Debug,
    Info,
    /// Recoverable misuse (double release, unknown handle)
    Warn,
    /// Errors returned to the caller
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by `DefaultLogger`
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    fn colored_label(&self) -> ColoredString {
        let label = self.label();
        match self {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        }
    }
}

/// Console logger
///
/// Line format: `[timestamp] [SEVERITY] [source] message`, followed by
/// ` (file:line)` when the entry carries a location.
pub struct DefaultLogger;

impl DefaultLogger {
    /// Render an entry without colors
    pub fn format_plain(entry: &LogEntry) -> String {
        render(entry, entry.severity.label(), &entry.source)
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let line = render(entry, entry.severity.colored_label(), entry.source.bright_blue());
        eprintln!("{}", line);
    }
}

fn render(entry: &LogEntry, severity: impl Display, source: impl Display) -> String {
    let local: DateTime<Local> = entry.timestamp.into();
    let mut line = format!(
        "[{}] [{}] [{}] {}",
        local.format("%Y-%m-%d %H:%M:%S%.3f"),
        severity,
        source,
        entry.message
    );
    if let (Some(file), Some(number)) = (entry.file, entry.line) {
        line.push_str(&format!(" ({}:{})", file, number));
    }
    line
}

// ===== LOGGING MACROS =====

#[doc(hidden)]
#[macro_export]
macro_rules! __forge_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::forge::Runtime::log(
            $crate::forge::log::LogSeverity::$severity,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a TRACE message
///
/// ```no_run
/// vertex_forge::forge_trace!("forge::headless", "bind_buffer {:?}", 3);
/// ```
#[macro_export]
macro_rules! forge_trace {
    ($source:expr, $($arg:tt)*) => { $crate::__forge_log!(Trace, $source, $($arg)*) };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! forge_debug {
    ($source:expr, $($arg:tt)*) => { $crate::__forge_log!(Debug, $source, $($arg)*) };
}

/// Log an INFO message
#[macro_export]
macro_rules! forge_info {
    ($source:expr, $($arg:tt)*) => { $crate::__forge_log!(Info, $source, $($arg)*) };
}

/// Log a WARN message
///
/// ```no_run
/// vertex_forge::forge_warn!("forge::headless", "release of unknown buffer {}", 7);
/// ```
#[macro_export]
macro_rules! forge_warn {
    ($source:expr, $($arg:tt)*) => { $crate::__forge_log!(Warn, $source, $($arg)*) };
}

/// Log an ERROR message with the call site location
///
/// Usually reached through `forge_err!` / `forge_bail!`.
#[macro_export]
macro_rules! forge_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::forge::Runtime::log_detailed(
            $crate::forge::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
