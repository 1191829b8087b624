use super::payloads::SteamProfile;
use super::validate::PayloadSchema;
use super::Platform;
use serde::{Deserialize, Serialize};

/// Snapshot of the launcher configuration as owned by the native backend.
///
/// Values are only ever replaced wholesale; nothing in this crate edits one in place
/// after it has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LaunchConfig {
    pub is_setup: bool,
    pub battle_net: BattleNetState,
    pub steam: SteamState,
    pub background: BackgroundState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BattleNetState {
    pub enabled: bool,
    pub config: Option<String>,
    pub install: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SteamState {
    pub enabled: bool,
    pub setup: bool,
    pub profiles: Option<Vec<SteamProfile>>,
    pub install: Option<String>,
    pub configs: Option<Vec<SteamLocalConfig>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SteamLocalConfig {
    pub id: String,
    pub file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackgroundState {
    pub current: Option<String>,
    pub is_outdated: bool,
}

impl LaunchConfig {
    /// Configuration the backend writes after a full reset.
    pub fn unconfigured() -> Self {
        Self {
            is_setup: false,
            battle_net: BattleNetState::default(),
            steam: SteamState::default(),
            background: BackgroundState::default(),
        }
    }

    pub fn enabled_platforms(&self) -> Vec<Platform> {
        let mut platforms = Vec::new();
        if self.steam.enabled {
            platforms.push(Platform::Steam);
        }
        if self.battle_net.enabled {
            platforms.push(Platform::BattleNet);
        }
        platforms
    }

    /// Steam was enabled by setup but its accounts have not been confirmed yet.
    pub fn needs_steam_confirmation(&self) -> bool {
        self.steam.enabled && !self.steam.setup
    }
}

impl PayloadSchema for LaunchConfig {
    const NAME: &'static str = "LaunchConfig";

    fn check(&self) -> Result<(), String> {
        if let Some(profiles) = &self.steam.profiles {
            for profile in profiles {
                profile.check()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_platforms_lists_steam_before_battle_net() {
        let mut config = LaunchConfig::unconfigured();
        config.battle_net.enabled = true;
        config.steam.enabled = true;
        assert_eq!(
            config.enabled_platforms(),
            vec![Platform::Steam, Platform::BattleNet]
        );
    }

    #[test]
    fn steam_confirmation_is_needed_only_while_unconfirmed() {
        let mut config = LaunchConfig::unconfigured();
        assert!(!config.needs_steam_confirmation());
        config.steam.enabled = true;
        assert!(config.needs_steam_confirmation());
        config.steam.setup = true;
        assert!(!config.needs_steam_confirmation());
    }
}
