pub mod background;

use crate::schema::{Background, LaunchConfig, SettingsData};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use background::resolve_active_background;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CacheKey {
    Launch,
    Settings,
    Backgrounds,
    ActiveBackground,
}

#[derive(Debug, Default)]
struct CacheState {
    launch: Option<LaunchConfig>,
    settings: Option<SettingsData>,
    backgrounds: Option<Vec<Background>>,
    active_background: Option<Background>,
    versions: BTreeMap<CacheKey, u64>,
    stale: BTreeSet<CacheKey>,
}

impl CacheState {
    fn touch(&mut self, key: CacheKey) {
        *self.versions.entry(key).or_insert(0) += 1;
    }
}

/// Client-side store shared by every screen.
///
/// Values are swapped wholesale, never patched. Only the setup orchestrator and the
/// mutation client write `Launch` and `Settings`; everything else observes versions
/// and re-reads when they move.
#[derive(Debug, Default)]
pub struct LaunchCache {
    state: RwLock<CacheState>,
}

/// The settings screen's view of a configuration.
pub fn derive_settings_view(config: &LaunchConfig) -> SettingsData {
    SettingsData {
        platforms: config.enabled_platforms(),
        steam_profiles: if config.steam.enabled && config.steam.setup {
            config.steam.profiles.clone()
        } else {
            None
        },
    }
}

impl LaunchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> Option<LaunchConfig> {
        self.read_state().launch.clone()
    }

    pub fn is_setup(&self) -> bool {
        self.read_state()
            .launch
            .as_ref()
            .is_some_and(|config| config.is_setup)
    }

    /// Atomically swaps the configuration and invalidates the views derived from it.
    pub fn replace(&self, config: LaunchConfig) {
        let mut state = self.write_state();
        state.settings = Some(derive_settings_view(&config));
        state.launch = Some(config);
        state.active_background = None;
        state.stale.remove(&CacheKey::Launch);
        state.stale.remove(&CacheKey::Settings);
        state.stale.insert(CacheKey::ActiveBackground);
        for key in [
            CacheKey::Launch,
            CacheKey::Settings,
            CacheKey::ActiveBackground,
        ] {
            state.touch(key);
        }
    }

    pub fn settings(&self) -> Option<SettingsData> {
        self.read_state().settings.clone()
    }

    pub fn replace_settings(&self, settings: SettingsData) {
        let mut state = self.write_state();
        state.settings = Some(settings);
        state.stale.remove(&CacheKey::Settings);
        state.touch(CacheKey::Settings);
    }

    pub fn backgrounds(&self) -> Option<Vec<Background>> {
        self.read_state().backgrounds.clone()
    }

    pub fn replace_backgrounds(&self, backgrounds: Vec<Background>) {
        let mut state = self.write_state();
        state.backgrounds = Some(backgrounds);
        state.active_background = None;
        state.stale.remove(&CacheKey::Backgrounds);
        state.stale.insert(CacheKey::ActiveBackground);
        state.touch(CacheKey::Backgrounds);
        state.touch(CacheKey::ActiveBackground);
    }

    pub fn active_background(&self) -> Option<Background> {
        self.read_state().active_background.clone()
    }

    pub fn set_active_background(&self, background: Background) {
        let mut state = self.write_state();
        state.active_background = Some(background);
        state.stale.remove(&CacheKey::ActiveBackground);
        state.touch(CacheKey::ActiveBackground);
    }

    pub fn invalidate(&self, key: CacheKey) {
        let mut state = self.write_state();
        state.stale.insert(key);
        state.touch(key);
    }

    /// Bumped on every write or invalidation of `key`.
    pub fn version(&self, key: CacheKey) -> u64 {
        self.read_state().versions.get(&key).copied().unwrap_or(0)
    }

    pub fn is_stale(&self, key: CacheKey) -> bool {
        self.read_state().stale.contains(&key)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
