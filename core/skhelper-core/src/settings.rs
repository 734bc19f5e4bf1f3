//! User settings snapshot.
//!
//! The launcher owns the real settings UI; skhelper only ever sees an immutable
//! copy that is passed explicitly into every component call. The hook adapter
//! reads the copy from `settings.json` in the data directory.

use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{HelperError, Result};
use crate::storage::atomic_write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Helper services run for every game unless the game opts out.
    #[default]
    Global,
    /// Helper services run only for games that opt in.
    Selective,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub stop_execution_if_vac: bool,
    #[serde(default)]
    pub execution_mode: ExecutionMode,
    #[serde(default = "default_true")]
    pub only_execute_pc_games: bool,
    #[serde(default)]
    pub enable_steam_overlay_on_new_profiles: bool,
    #[serde(default)]
    pub enable_reshade_on_new_profiles: bool,
    #[serde(default)]
    pub set_default_fps_on_new_profiles: bool,
    #[serde(default)]
    pub default_fps_limit: u32,
    #[serde(default)]
    pub disable_nvidia_bloatware_on_new_profiles: bool,
    #[serde(default)]
    pub use_flip_model_on_new_profiles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            stop_execution_if_vac: true,
            execution_mode: ExecutionMode::Global,
            only_execute_pc_games: true,
            enable_steam_overlay_on_new_profiles: false,
            enable_reshade_on_new_profiles: false,
            set_default_fps_on_new_profiles: false,
            default_fps_limit: 0,
            disable_nvidia_bloatware_on_new_profiles: false,
            use_flip_model_on_new_profiles: false,
        }
    }
}

impl Settings {
    /// Loads settings, returning defaults if the file is missing or unreadable.
    pub fn load(path: &Path) -> Settings {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Settings::default(),
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Settings file malformed, using defaults"
                );
                Settings::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| HelperError::io("create settings directory", e))?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| HelperError::Json {
            context: "serialize settings".to_string(),
            source: e,
        })?;
        atomic_write(path, content.as_bytes())
    }
}

fn default_true() -> bool {
    true
}
