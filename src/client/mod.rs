pub mod error;

use crate::cache::{resolve_active_background, LaunchCache};
use crate::gateway::{Gateway, GatewayRequest};
use crate::schema::{
    validate_payload, Background, LaunchConfig, PayloadSchema, SettingsData, SetupPathResponse,
    SteamProfile,
};
use crate::setup::ConfigErrorKey;
use crate::shared::logging::{append_setup_log, LogLevel};
use std::path::PathBuf;
use std::sync::Arc;

pub use error::BridgeError;

/// Typed, validated access to the backend commands outside the setup state machine.
///
/// Every command that answers with a `LaunchConfig` replaces the cached configuration.
#[derive(Clone)]
pub struct LaunchClient {
    gateway: Arc<dyn Gateway>,
    cache: Arc<LaunchCache>,
    log_path: Option<PathBuf>,
}

impl LaunchClient {
    pub fn new(gateway: Arc<dyn Gateway>, cache: Arc<LaunchCache>) -> Self {
        Self {
            gateway,
            cache,
            log_path: None,
        }
    }

    pub fn with_log_path(mut self, log_path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(log_path.into());
        self
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    pub fn cache(&self) -> &Arc<LaunchCache> {
        &self.cache
    }

    pub fn log_path(&self) -> Option<&std::path::Path> {
        self.log_path.as_deref()
    }

    pub fn load_launch_config(&self) -> Result<LaunchConfig, BridgeError> {
        self.replace_config(GatewayRequest::GetLaunchConfig, "Failed to load launch config.")
    }

    pub fn setup_path(&self, key: ConfigErrorKey) -> Result<SetupPathResponse, BridgeError> {
        self.call(
            GatewayRequest::GetSetupPath { key },
            "Failed to get setup paths.",
        )
    }

    pub fn steam_accounts(&self) -> Result<Vec<SteamProfile>, BridgeError> {
        self.call(
            GatewayRequest::GetSteamAccounts,
            "Failed to get Steam accounts.",
        )
    }

    pub fn confirm_steam_setup(&self) -> Result<LaunchConfig, BridgeError> {
        self.replace_config(
            GatewayRequest::ConfirmSteamSetup,
            "Failed to confirm Steam setup.",
        )
    }

    pub fn backgrounds(&self) -> Result<Vec<Background>, BridgeError> {
        let backgrounds: Vec<Background> =
            self.call(GatewayRequest::GetBackgrounds, "Failed to get backgrounds.")?;
        self.cache.replace_backgrounds(backgrounds.clone());
        Ok(backgrounds)
    }

    /// Resolves the background the menu should show, loading whatever is not cached yet.
    pub fn active_background(&self) -> Result<Option<Background>, BridgeError> {
        if let Some(active) = self.cache.active_background() {
            return Ok(Some(active));
        }
        let backgrounds = match self.cache.backgrounds() {
            Some(backgrounds) => backgrounds,
            None => self.backgrounds()?,
        };
        let config = match self.cache.read() {
            Some(config) => config,
            None => self.load_launch_config()?,
        };
        let active =
            resolve_active_background(&backgrounds, config.background.current.as_deref()).cloned();
        if let Some(background) = &active {
            self.cache.set_active_background(background.clone());
        }
        Ok(active)
    }

    pub fn set_background(&self, id: &str) -> Result<LaunchConfig, BridgeError> {
        self.replace_config(
            GatewayRequest::SetBackground { id: id.to_string() },
            "Failed to save background change.",
        )
    }

    pub fn reset_background(&self) -> Result<LaunchConfig, BridgeError> {
        self.replace_config(
            GatewayRequest::ResetBackground,
            "Failed to reset background.",
        )
    }

    pub fn reset(&self) -> Result<LaunchConfig, BridgeError> {
        self.replace_config(GatewayRequest::Reset, "Failed to reset.")
    }

    pub fn settings_data(&self) -> Result<SettingsData, BridgeError> {
        let settings: SettingsData =
            self.call(GatewayRequest::GetSettingsData, "Failed to get settings.")?;
        self.cache.replace_settings(settings.clone());
        Ok(settings)
    }

    fn replace_config(
        &self,
        request: GatewayRequest,
        context: &'static str,
    ) -> Result<LaunchConfig, BridgeError> {
        let config: LaunchConfig = self.call(request, context)?;
        self.cache.replace(config.clone());
        Ok(config)
    }

    fn call<T: PayloadSchema>(
        &self,
        request: GatewayRequest,
        context: &'static str,
    ) -> Result<T, BridgeError> {
        let raw = self.gateway.invoke(&request).map_err(|failure| {
            self.log(
                LogLevel::Warn,
                "bridge.failure",
                &format!("{} failed: {failure}", request.command()),
            );
            BridgeError::from(failure)
        })?;
        validate_payload::<T>(&raw).map_err(|source| {
            self.log(
                LogLevel::Error,
                "bridge.validation",
                &format!(
                    "{} returned an invalid {} payload ({}): {}",
                    request.command(),
                    source.schema(),
                    source.reason(),
                    source.payload()
                ),
            );
            BridgeError::Validation { context, source }
        })
    }

    fn log(&self, level: LogLevel, event: &str, message: &str) {
        if let Some(path) = &self.log_path {
            append_setup_log(path, level, event, message);
        }
    }
}
