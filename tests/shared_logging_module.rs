use overbuddy::shared::logging::{append_setup_log, LogLevel};
use std::fs;
use tempfile::tempdir;

#[test]
fn setup_log_writes_one_json_object_per_line() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("logs/setup.log");

    append_setup_log(&path, LogLevel::Info, "setup.attempt", "attempt 1: setup");
    append_setup_log(&path, LogLevel::Error, "setup.outcome", "attempt 1 failed");

    let log = fs::read_to_string(&path).expect("read setup log");
    let lines: Vec<serde_json::Value> = log
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["level"], "info");
    assert_eq!(lines[0]["event"], "setup.attempt");
    assert_eq!(lines[1]["level"], "error");
    assert_eq!(lines[1]["message"], "attempt 1 failed");
    let timestamp = lines[0]["timestamp"].as_str().expect("timestamp");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[test]
fn unwritable_log_path_is_ignored() {
    let temp = tempdir().expect("tempdir");
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "file").expect("write blocker");

    append_setup_log(&blocker.join("setup.log"), LogLevel::Warn, "setup.rejected", "ignored");

    assert_eq!(fs::read_to_string(&blocker).expect("read blocker"), "file");
}
