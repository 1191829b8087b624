use super::paths::DEFAULT_LOG_FILE;
use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_setup_timeout_ms() -> u64 {
    30_000
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Directory that relative paths resolve against. Defaults to `~/.overbuddy`.
    #[serde(default)]
    pub state_root: Option<PathBuf>,
    #[serde(default = "default_setup_timeout_ms")]
    pub setup_timeout_ms: u64,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_root: None,
            setup_timeout_ms: default_setup_timeout_ms(),
            log_file: default_log_file(),
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.setup_timeout_ms == 0 {
            return Err(ConfigError::Settings(
                "`setup_timeout_ms` must be greater than zero".to_string(),
            ));
        }
        if let Some(root) = &self.state_root {
            if !root.is_absolute() {
                return Err(ConfigError::Settings(
                    "`state_root` must be an absolute path".to_string(),
                ));
            }
        }
        if self.log_file.as_os_str().is_empty() {
            return Err(ConfigError::Settings(
                "`log_file` must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute log path, anchored at `state_root` (or `fallback_root`) when relative.
    pub fn resolve_log_path(&self, fallback_root: &Path) -> PathBuf {
        if self.log_file.is_absolute() {
            return self.log_file.clone();
        }
        self.state_root
            .as_deref()
            .unwrap_or(fallback_root)
            .join(&self.log_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_fall_back_to_defaults() {
        let settings: Settings = serde_yaml::from_str("state_root: /srv/overbuddy\n").expect("yaml");
        assert_eq!(settings.setup_timeout_ms, 30_000);
        assert_eq!(
            settings.resolve_log_path(Path::new("/unused")),
            PathBuf::from("/srv/overbuddy/logs/setup.log")
        );
        settings.validate().expect("valid");
    }

    #[test]
    fn zero_timeout_and_relative_root_are_rejected() {
        let zero: Settings = serde_yaml::from_str("setup_timeout_ms: 0\n").expect("yaml");
        assert!(zero.validate().is_err());

        let relative: Settings = serde_yaml::from_str("state_root: relative/dir\n").expect("yaml");
        let err = relative.validate().expect_err("relative root");
        assert!(err.to_string().contains("absolute"));
    }
}
