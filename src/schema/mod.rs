pub mod launch;
pub mod payloads;
pub mod platform;
pub mod validate;

pub use launch::{BackgroundState, BattleNetState, LaunchConfig, SteamLocalConfig, SteamState};
pub use payloads::{Background, SettingsData, SetupPathResponse, SteamProfile};
pub use platform::{dedup_platforms, Platform, ALL_PLATFORMS};
pub use validate::{validate_payload, PayloadSchema, ValidationError};
