//! Integration tests for the logging system
//!
//! These tests replace the process-wide logger, so every test is `#[serial]`.
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use std::rc::Rc;
use std::sync::{Arc, Mutex};
use serial_test::serial;
use vertex_forge::forge::{Config, Error, Runtime, VertexArray, VertexBuffer};
use vertex_forge::forge::driver::{Driver, DriverRef, HeadlessDriver};
use vertex_forge::forge::log::{Logger, LogEntry, LogSeverity};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn with_min_severity(severity: LogSeverity) {
    Runtime::set_config(Config {
        min_log_severity: severity,
        ..Config::default()
    });
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    with_min_severity(LogSeverity::Trace);
    let (test_logger, entries) = TestLogger::new();
    Runtime::set_logger(test_logger);

    Runtime::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Runtime::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());
    Runtime::log_detailed(LogSeverity::Error, "test::module", "Test error message".to_string(), "file.rs", 9);

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 3);

        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].source, "test::module");
        assert_eq!(captured[0].message, "Test info message");
        assert_eq!(captured[0].file, None);

        assert_eq!(captured[1].severity, LogSeverity::Warn);

        assert_eq!(captured[2].severity, LogSeverity::Error);
        assert_eq!(captured[2].file, Some("file.rs"));
        assert_eq!(captured[2].line, Some(9));
    }

    Runtime::reset_logger();
    Runtime::reset_config();
}

#[test]
#[serial]
fn test_integration_min_severity_filter() {
    with_min_severity(LogSeverity::Warn);
    let (test_logger, entries) = TestLogger::new();
    Runtime::set_logger(test_logger);

    Runtime::log(LogSeverity::Trace, "test::module", "dropped".to_string());
    Runtime::log(LogSeverity::Debug, "test::module", "dropped".to_string());
    Runtime::log(LogSeverity::Info, "test::module", "dropped".to_string());
    Runtime::log(LogSeverity::Warn, "test::module", "kept".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].message, "kept");
    }

    Runtime::reset_logger();
    Runtime::reset_config();
}

#[test]
#[serial]
fn test_integration_errors_are_logged_with_location() {
    with_min_severity(LogSeverity::Trace);
    let (test_logger, entries) = TestLogger::new();
    Runtime::set_logger(test_logger);

    let driver: DriverRef = Rc::new(HeadlessDriver::new());
    let mut array = VertexArray::new(&driver).unwrap();
    let bare = VertexBuffer::new(&driver, &[0.0; 3]).unwrap();
    let result = array.add_vertex_buffer(bare);
    assert_eq!(result, Err(Error::ConfigurationError("missing layout".to_string())));

    {
        let captured = entries.lock().unwrap();
        let error = captured
            .iter()
            .find(|entry| entry.severity == LogSeverity::Error)
            .expect("error entry");
        assert_eq!(error.source, "forge::VertexArray");
        assert_eq!(error.message, "missing layout");
        assert!(error.file.is_some());
        assert!(error.line.is_some());

        // Creation is logged at DEBUG, driver calls at TRACE
        assert!(captured.iter().any(|e| e.severity == LogSeverity::Debug && e.source == "forge::VertexArray"));
        assert!(captured.iter().any(|e| e.severity == LogSeverity::Trace && e.source == "forge::headless"));
    }

    Runtime::reset_logger();
    Runtime::reset_config();
}

#[test]
#[serial]
fn test_integration_double_release_is_warned() {
    with_min_severity(LogSeverity::Trace);
    let (test_logger, entries) = TestLogger::new();
    Runtime::set_logger(test_logger);

    let driver = HeadlessDriver::new();
    let array = driver.create_vertex_array().unwrap();
    driver.destroy_vertex_array(array);
    driver.destroy_vertex_array(array);

    {
        let captured = entries.lock().unwrap();
        let warnings: Vec<&LogEntry> = captured
            .iter()
            .filter(|entry| entry.severity == LogSeverity::Warn)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source, "forge::headless");
    }

    Runtime::reset_logger();
    Runtime::reset_config();
}
