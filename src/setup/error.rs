use crate::schema::{Platform, ValidationError};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ConfigErrorKey {
    BattleNetConfig,
    BattleNetInstall,
    SteamInstall,
    SteamAccount,
    NoOverwatch,
}

impl ConfigErrorKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BattleNetConfig => "BattleNetConfig",
            Self::BattleNetInstall => "BattleNetInstall",
            Self::SteamInstall => "SteamInstall",
            Self::SteamAccount => "SteamAccount",
            Self::NoOverwatch => "NoOverwatch",
        }
    }
}

impl std::fmt::Display for ConfigErrorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A setup failure the backend classified for us.
///
/// `platforms` is the selection that was in progress when the backend gave up and
/// must be carried into every retry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ConfigError {
    pub error_key: ConfigErrorKey,
    pub message: String,
    #[serde(deserialize_with = "platforms_or_null")]
    pub platforms: Vec<Platform>,
}

// The backend reports `NoOverwatch` with `"platforms": null`.
fn platforms_or_null<'de, D>(deserializer: D) -> Result<Vec<Platform>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Vec<Platform>>::deserialize(deserializer) {
        Ok(platforms) => Ok(platforms.unwrap_or_default()),
        Err(err) => Err(D::Error::custom(format!("invalid platforms: {err}"))),
    }
}

/// Outcomes that land the orchestrator in its generic failure phase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupFailure {
    #[error("Failed to setup!")]
    AllPlatformsDisabled,
    #[error("Failed to setup. {0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Unclassified(String),
    #[error("Failed to setup. Received: [[{payload}]], Error: [[{reason}]]")]
    MalformedConfigError { payload: String, reason: String },
    #[error("unexpected bridge failure: {0}")]
    Unexpected(String),
    #[error("Setup timed out after {timeout_ms}ms without a response.")]
    TimedOut { timeout_ms: u64 },
}

impl SetupFailure {
    /// Whether reissuing the same attempt could change the outcome.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::AllPlatformsDisabled)
    }
}

/// Actions refused locally, before any backend round-trip. State is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupRejection {
    #[error("You must select at least one platform.")]
    EmptySelection,
    #[error("a setup request is already in flight")]
    CallInFlight,
    #[error("Please select the [[{expected}]] file.")]
    WrongFile {
        expected: &'static str,
        picked: PathBuf,
    },
    #[error("a file path is required to resolve `{key}`")]
    MissingPath { key: ConfigErrorKey },
    #[error("`{key}` cannot be resolved here; restart setup instead")]
    NotRetryable { key: ConfigErrorKey },
    #[error("setup action `{action}` is not available while {phase}")]
    InvalidAction {
        phase: &'static str,
        action: &'static str,
    },
}
