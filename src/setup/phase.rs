use super::error::{ConfigError, ConfigErrorKey, SetupFailure};
use super::recovery::RecoveryStep;
use crate::gateway::GatewayRequest;
use crate::schema::{LaunchConfig, Platform};

/// One backend call the orchestrator can have in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupAttempt {
    Setup {
        platforms: Vec<Platform>,
        is_initialized: bool,
    },
    Resolve {
        key: ConfigErrorKey,
        path: String,
        platforms: Vec<Platform>,
    },
    ConfirmSteam,
}

impl SetupAttempt {
    pub fn request(&self) -> GatewayRequest {
        match self {
            Self::Setup {
                platforms,
                is_initialized,
            } => GatewayRequest::Setup {
                platforms: platforms.clone(),
                is_initialized: *is_initialized,
            },
            Self::Resolve {
                key,
                path,
                platforms,
            } => GatewayRequest::ResolveSetupError {
                key: *key,
                path: path.clone(),
                platforms: platforms.clone(),
            },
            Self::ConfirmSteam => GatewayRequest::ConfirmSteamSetup,
        }
    }

    pub fn platforms(&self) -> &[Platform] {
        match self {
            Self::Setup { platforms, .. } | Self::Resolve { platforms, .. } => platforms,
            Self::ConfirmSteam => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Complete,
    /// Steam is enabled but its accounts still need an explicit confirmation.
    SteamConfirmationRequired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupPhase {
    Idle,
    Attempting {
        attempt: SetupAttempt,
    },
    Succeeded {
        config: LaunchConfig,
        completion: Completion,
    },
    FailedClassified {
        error: ConfigError,
        step: RecoveryStep,
    },
    FailedGeneric {
        failure: SetupFailure,
        resume: Box<SetupPhase>,
        retry: Option<SetupAttempt>,
    },
}

impl SetupPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Attempting { .. } => "attempting",
            Self::Succeeded { .. } => "succeeded",
            Self::FailedClassified { .. } => "failed_classified",
            Self::FailedGeneric { .. } => "failed_generic",
        }
    }

    /// Setup finished and no detour is pending.
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            Self::Succeeded {
                completion: Completion::Complete,
                ..
            }
        )
    }
}

impl std::fmt::Display for SetupPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupAction {
    Submit,
    Recover,
    Retry,
    Dismiss,
    ConfirmSteam,
}

impl SetupAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Recover => "recover",
            Self::Retry => "retry",
            Self::Dismiss => "dismiss",
            Self::ConfirmSteam => "confirm_steam",
        }
    }
}

/// A classified failure seen during the current setup run, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryHop {
    pub key: ConfigErrorKey,
    pub message: String,
    pub platforms: Vec<Platform>,
}

impl From<&ConfigError> for RecoveryHop {
    fn from(error: &ConfigError) -> Self {
        Self {
            key: error.error_key,
            message: error.message.clone(),
            platforms: error.platforms.clone(),
        }
    }
}
