//! Tests for `src/logging.rs`.

use penwright::logging::{LoggingGuard, LOG_FILE_NAME};

#[test]
fn logging_guard_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<LoggingGuard>();
}

#[test]
fn init_file_creates_logs_dir() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let logs_dir = tmp.path().join("logs");
    assert!(!logs_dir.exists());

    // Only one global subscriber can be installed per process, so the
    // result may be an error here; the directory is created either way.
    let _result = penwright::logging::init_file(&logs_dir, "debug");
    assert!(logs_dir.exists(), "logs directory should be created");
}

#[test]
fn init_cli_reports_existing_subscriber() {
    // The first call may already fail if another test installed one.
    let _first = penwright::logging::init_cli("info");
    let second = penwright::logging::init_cli("warn");
    assert!(second.is_err(), "second install should be reported");
}

#[test]
fn log_file_name_is_crate_scoped() {
    assert!(LOG_FILE_NAME.starts_with("penwright"));
}
