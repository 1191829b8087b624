use overbuddy::config::{load_settings_or_default, ConfigError, Settings};
use overbuddy::setup::{SetupOptions, DEFAULT_SETUP_TIMEOUT};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn missing_settings_file_yields_defaults() {
    let temp = tempdir().expect("tempdir");
    let settings =
        load_settings_or_default(&temp.path().join("config.yaml")).expect("default settings");

    assert_eq!(settings, Settings::default());
    let options = SetupOptions::from_settings(&settings, temp.path());
    assert_eq!(options.timeout, DEFAULT_SETUP_TIMEOUT);
    assert_eq!(options.log_path, Some(temp.path().join("logs/setup.log")));
}

#[test]
fn settings_file_overrides_timeout_and_log_location() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config.yaml");
    let root = temp.path().join("state");
    fs::write(
        &path,
        format!(
            "state_root: {}\nsetup_timeout_ms: 1500\nlog_file: setup/events.log\n",
            root.display()
        ),
    )
    .expect("write settings");

    let settings = load_settings_or_default(&path).expect("load settings");
    let options = SetupOptions::from_settings(&settings, PathBuf::from("/unused").as_path());

    assert_eq!(options.timeout, Duration::from_millis(1500));
    assert_eq!(options.log_path, Some(root.join("setup/events.log")));
}

#[test]
fn invalid_yaml_and_zero_timeout_are_errors() {
    let temp = tempdir().expect("tempdir");
    let broken = temp.path().join("broken.yaml");
    fs::write(&broken, "setup_timeout_ms: [\n").expect("write broken");
    assert!(matches!(
        load_settings_or_default(&broken),
        Err(ConfigError::Parse { .. })
    ));

    let zero = temp.path().join("zero.yaml");
    fs::write(&zero, "setup_timeout_ms: 0\n").expect("write zero");
    let err = load_settings_or_default(&zero).expect_err("zero timeout");
    assert!(matches!(err, ConfigError::Settings(_)));
    assert!(err.to_string().contains("setup_timeout_ms"));
}
