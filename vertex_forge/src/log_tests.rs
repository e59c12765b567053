//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry and DefaultLogger formatting.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "forge::VertexArray".to_string(),
        message: "Added buffer".to_string(),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_have_fixed_width() {
    let severities = [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ];
    for severity in severities {
        assert_eq!(severity.label().len(), 5, "{:?}", severity);
    }
    assert_eq!(LogSeverity::Info.label(), "INFO ");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_clone() {
    let original = entry(LogSeverity::Error, Some("vertex_array.rs"), Some(42));
    let cloned = original.clone();
    assert_eq!(cloned.severity, LogSeverity::Error);
    assert_eq!(cloned.source, original.source);
    assert_eq!(cloned.file, Some("vertex_array.rs"));
    assert_eq!(cloned.line, Some(42));
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_format_plain_without_location() {
    let text = DefaultLogger::format_plain(&entry(LogSeverity::Debug, None, None));
    assert!(text.contains("[DEBUG]"));
    assert!(text.contains("[forge::VertexArray]"));
    assert!(text.ends_with("Added buffer"));
}

#[test]
fn test_format_plain_with_location() {
    let text = DefaultLogger::format_plain(&entry(LogSeverity::Error, Some("vertex_array.rs"), Some(7)));
    assert!(text.contains("[ERROR]"));
    assert!(text.ends_with("Added buffer (vertex_array.rs:7)"));
}

#[test]
fn test_format_plain_timestamp_prefix() {
    let text = DefaultLogger::format_plain(&entry(LogSeverity::Info, None, None));
    // [YYYY-MM-DD HH:MM:SS.mmm]
    assert!(text.starts_with('['));
    assert_eq!(text.find(']'), Some(24));
}

#[test]
fn test_default_logger_does_not_panic() {
    let logger = DefaultLogger;
    logger.log(&entry(LogSeverity::Trace, None, None));
    logger.log(&entry(LogSeverity::Error, Some("file.rs"), Some(1)));
}
