/// Vertex Forge runtime - process-wide logger and configuration
///
/// Buffers and arrays are single-threaded resources, but the logger and the
/// configuration are shared by every driver context in the process, so they
/// live in thread-safe static storage guarded by RwLock.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::config::Config;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== GLOBAL STATE =====

/// Installed logger, `DefaultLogger` until replaced
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Global configuration (initialized with Config::default())
static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

fn config_lock() -> &'static RwLock<Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default()))
}

// ===== PUBLIC API =====

/// Runtime singleton manager
///
/// # Example
///
/// ```no_run
/// use vertex_forge::forge::{Runtime, Config, CapacityPolicy};
///
/// Runtime::set_config(Config {
///     capacity_policy: CapacityPolicy::Reject,
///     ..Config::default()
/// });
/// ```
pub struct Runtime;

impl Runtime {
    // ===== CONFIGURATION API =====

    /// Replace the process-wide configuration
    ///
    /// Only buffers created afterwards pick up the new values.
    pub fn set_config(config: Config) {
        if let Ok(mut lock) = config_lock().write() {
            *lock = config;
        }
        crate::forge_debug!("forge::Runtime", "Configuration replaced");
    }

    /// Snapshot of the current configuration
    pub fn config() -> Config {
        config_lock()
            .read()
            .map(|config| config.clone())
            .unwrap_or_default()
    }

    /// Restore `Config::default()`
    pub fn reset_config() {
        if let Ok(mut lock) = config_lock().write() {
            *lock = Config::default();
        }
    }

    // ===== LOGGING API =====

    /// Install a logger for the whole process
    ///
    /// ```no_run
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use vertex_forge::forge::{Runtime, log::{Logger, LogEntry}};
    ///
    /// struct CountingLogger(AtomicUsize);
    /// impl Logger for CountingLogger {
    ///     fn log(&self, _entry: &LogEntry) {
    ///         self.0.fetch_add(1, Ordering::Relaxed);
    ///     }
    /// }
    ///
    /// Runtime::set_logger(CountingLogger(AtomicUsize::new(0)));
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Go back to `DefaultLogger`
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Logging entry point without file:line
    ///
    /// Used by macros like forge_info!, forge_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Logging entry point with file:line information
    ///
    /// Used by forge_error! to include the source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        let min_severity = config_lock()
            .read()
            .map(|config| config.min_log_severity)
            .unwrap_or(LogSeverity::Trace);
        if severity < min_severity {
            return;
        }

        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file,
                line,
            });
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
