pub mod scripted;

use crate::schema::Platform;
use crate::setup::ConfigErrorKey;
use serde_json::{json, Value};

pub use scripted::ScriptedGateway;

/// Request/response bridge to the native configuration backend.
///
/// Success payloads are serialized JSON strings and must pass
/// [`crate::schema::validate_payload`] before use.
pub trait Gateway: Send + Sync {
    fn invoke(&self, request: &GatewayRequest) -> Result<String, GatewayFailure>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayRequest {
    GetLaunchConfig,
    Setup {
        platforms: Vec<Platform>,
        is_initialized: bool,
    },
    ResolveSetupError {
        key: ConfigErrorKey,
        path: String,
        platforms: Vec<Platform>,
    },
    GetSetupPath {
        key: ConfigErrorKey,
    },
    GetSteamAccounts,
    ConfirmSteamSetup,
    GetBackgrounds,
    SetBackground {
        id: String,
    },
    ResetBackground,
    Reset,
    GetSettingsData,
}

impl GatewayRequest {
    pub fn command(&self) -> &'static str {
        match self {
            Self::GetLaunchConfig => "get_launch_config",
            Self::Setup { .. } => "setup",
            Self::ResolveSetupError { .. } => "resolve_setup_error",
            Self::GetSetupPath { .. } => "get_setup_path",
            Self::GetSteamAccounts => "get_steam_accounts",
            Self::ConfirmSteamSetup => "confirm_steam_setup",
            Self::GetBackgrounds => "get_backgrounds",
            Self::SetBackground { .. } => "set_background",
            Self::ResetBackground => "reset_background",
            Self::Reset => "reset",
            Self::GetSettingsData => "get_settings_data",
        }
    }

    /// Argument object in the bridge's camelCase convention.
    pub fn args(&self) -> Value {
        match self {
            Self::Setup {
                platforms,
                is_initialized,
            } => json!({
                "platforms": platforms,
                "isInitialized": is_initialized,
            }),
            Self::ResolveSetupError {
                key,
                path,
                platforms,
            } => json!({
                "key": key,
                "path": path,
                "platforms": platforms,
            }),
            Self::GetSetupPath { key } => json!({ "key": key }),
            Self::SetBackground { id } => json!({ "id": id }),
            Self::GetLaunchConfig
            | Self::GetSteamAccounts
            | Self::ConfirmSteamSetup
            | Self::GetBackgrounds
            | Self::ResetBackground
            | Self::Reset
            | Self::GetSettingsData => json!({}),
        }
    }

    /// Whether the backend treats this call as a write to the shared configuration.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Setup { .. }
                | Self::ResolveSetupError { .. }
                | Self::ConfirmSteamSetup
                | Self::SetBackground { .. }
                | Self::ResetBackground
                | Self::Reset
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayFailure {
    /// The backend rejected the call with a string, plain or JSON-encoded.
    #[error("{0}")]
    Text(String),
    /// Anything that is not a backend string: transport faults, bridge panics.
    #[error("unexpected bridge failure: {0}")]
    Unexpected(String),
}
