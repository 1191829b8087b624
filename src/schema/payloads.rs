use super::validate::PayloadSchema;
use super::Platform;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SteamProfile {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl PayloadSchema for SteamProfile {
    const NAME: &'static str = "SteamProfile";

    fn check(&self) -> Result<(), String> {
        url::Url::parse(&self.avatar)
            .map(|_| ())
            .map_err(|err| format!("steam profile `{}` has invalid avatar url: {err}", self.id))
    }
}

/// Advisory locations shown next to a manual file pick. Never authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupPathResponse {
    pub path: Option<String>,
    pub default_path: Option<String>,
}

impl PayloadSchema for SetupPathResponse {
    const NAME: &'static str = "SetupPathResponse";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SettingsData {
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub steam_profiles: Option<Vec<SteamProfile>>,
}

impl PayloadSchema for SettingsData {
    const NAME: &'static str = "SettingsData";

    fn check(&self) -> Result<(), String> {
        if let Some(profiles) = &self.steam_profiles {
            for profile in profiles {
                profile.check()?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Background {
    pub id: String,
    pub image: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl PayloadSchema for Background {
    const NAME: &'static str = "Background";
}
