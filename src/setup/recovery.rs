use super::error::{ConfigError, ConfigErrorKey, SetupRejection};
use super::phase::SetupAttempt;
use std::path::{Path, PathBuf};

pub const BATTLE_NET_CONFIG_FILE: &str = "Battle.net.config";
pub const BATTLE_NET_LAUNCHER_FILE: &str = "Battle.net Launcher.exe";
pub const STEAM_LAUNCHER_FILE: &str = "steam.exe";

/// What the user has to do before a classified failure can be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStep {
    PickFile { expected_file_name: &'static str },
    Rediscover,
    RestartSetup,
}

impl RecoveryStep {
    pub fn for_key(key: ConfigErrorKey) -> Self {
        match key {
            ConfigErrorKey::BattleNetConfig => Self::PickFile {
                expected_file_name: BATTLE_NET_CONFIG_FILE,
            },
            ConfigErrorKey::BattleNetInstall => Self::PickFile {
                expected_file_name: BATTLE_NET_LAUNCHER_FILE,
            },
            ConfigErrorKey::SteamInstall => Self::PickFile {
                expected_file_name: STEAM_LAUNCHER_FILE,
            },
            ConfigErrorKey::SteamAccount => Self::Rediscover,
            ConfigErrorKey::NoOverwatch => Self::RestartSetup,
        }
    }

    pub fn requires_path(self) -> bool {
        matches!(self, Self::PickFile { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryInput {
    None,
    FilePath(PathBuf),
}

impl RecoveryInput {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::FilePath(path.into())
    }
}

pub fn check_picked_file(expected: &'static str, picked: &Path) -> Result<(), SetupRejection> {
    match picked.file_name().and_then(|name| name.to_str()) {
        Some(name) if name == expected => Ok(()),
        _ => Err(SetupRejection::WrongFile {
            expected,
            picked: picked.to_path_buf(),
        }),
    }
}

/// Turns a classified failure plus the user's remediation into the next attempt.
///
/// The retry always carries `error.platforms` unchanged so the selection survives
/// any number of recovery hops.
pub fn plan_recovery(
    error: &ConfigError,
    input: &RecoveryInput,
) -> Result<SetupAttempt, SetupRejection> {
    match RecoveryStep::for_key(error.error_key) {
        RecoveryStep::PickFile { expected_file_name } => {
            let RecoveryInput::FilePath(path) = input else {
                return Err(SetupRejection::MissingPath {
                    key: error.error_key,
                });
            };
            check_picked_file(expected_file_name, path)?;
            Ok(SetupAttempt::Resolve {
                key: error.error_key,
                path: path.to_string_lossy().into_owned(),
                platforms: error.platforms.clone(),
            })
        }
        // TODO: move to resolve_setup_error once the backend stops treating
        // SteamAccount as an install-path fix.
        RecoveryStep::Rediscover => Ok(SetupAttempt::Setup {
            platforms: error.platforms.clone(),
            is_initialized: false,
        }),
        RecoveryStep::RestartSetup => Err(SetupRejection::NotRetryable {
            key: error.error_key,
        }),
    }
}
