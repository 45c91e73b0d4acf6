use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::platform::DEFAULT_TARGET_GAME_ID;
use crate::state::Settings;
use crate::timer::DEFAULT_WARNING_THRESHOLD_SECS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotkeyConfig {
    /// Show/hide the overlay
    pub toggle_overlay: String,

    /// Show/hide the settings panel
    pub toggle_settings: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle_overlay: "CmdOrCtrl+Shift+O".to_string(),
            toggle_settings: "CmdOrCtrl+Shift+S".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DemoConfig {
    /// Plant a spike this long after demo mode starts (`null` disables)
    pub auto_start_delay_ms: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            auto_start_delay_ms: Some(5000),
        }
    }
}

impl DemoConfig {
    pub fn auto_start_delay(&self) -> Option<Duration> {
        self.auto_start_delay_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Platform id of the game the overlay follows
    pub target_game_id: i64,

    /// Remaining seconds at which the warning sound plays
    pub warning_threshold_secs: u32,

    /// Real time per countdown tick
    pub tick_interval_ms: u64,

    /// Settings at startup (clamped into range)
    pub settings: Settings,

    pub hotkeys: HotkeyConfig,

    pub demo: DemoConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_game_id: DEFAULT_TARGET_GAME_ID,
            warning_threshold_secs: DEFAULT_WARNING_THRESHOLD_SECS,
            tick_interval_ms: 1000,
            settings: Settings::default(),
            hotkeys: HotkeyConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `config/config.json` next to
    /// the executable is used if present, otherwise defaults. Nothing is
    /// written to disk.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    tracing::info!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let load_failed =
            |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::LoadFailed {
                path: path.display().to_string(),
                source,
            };

        let content = fs::read_to_string(path).map_err(|e| load_failed(e.into()))?;
        let config = Self::from_json_str(&content).map_err(|e| load_failed(e.into()))?;

        tracing::info!("✓ Loaded config from: {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values the app cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tickIntervalMs must be greater than 0".to_string(),
            ));
        }

        if self.hotkeys.toggle_overlay.trim().is_empty()
            || self.hotkeys.toggle_settings.trim().is_empty()
        {
            return Err(ConfigError::Invalid("hotkey bindings must not be empty".to_string()));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// `config/config.json` in the executable's directory
    pub fn default_path() -> Option<PathBuf> {
        let exe_path = env::current_exe().ok()?;
        Some(exe_path.parent()?.join("config").join("config.json"))
    }
}
