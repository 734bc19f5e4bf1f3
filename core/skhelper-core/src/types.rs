//! Core types shared between the library and the hook adapter.
//!
//! A [`GameRecord`] is an immutable snapshot handed over by the launcher for a
//! single lifecycle event. Field names follow the launcher's JSON export, so
//! both `camelCase` and `PascalCase` spellings are accepted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Platform name the launcher uses for Windows PC games.
pub const PC_PLATFORM_NAME: &str = "PC (Windows)";
/// Stable platform specification id for Windows PC games.
pub const PC_PLATFORM_SPEC_ID: &str = "pc_windows";

// ═══════════════════════════════════════════════════════════════════════════════
// Game Snapshot
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformTag {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "SpecificationId")]
    pub specification_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureTag {
    #[serde(alias = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchAction {
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "Type")]
    pub kind: Option<String>,
    #[serde(default, alias = "Path")]
    pub path: Option<String>,
    #[serde(default, alias = "Arguments")]
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "InstallDirectory")]
    pub install_directory: Option<PathBuf>,
    #[serde(default, alias = "Platforms")]
    pub platforms: Vec<PlatformTag>,
    #[serde(default, alias = "Features")]
    pub features: Vec<FeatureTag>,
    #[serde(default, alias = "GameActions")]
    pub game_actions: Vec<LaunchAction>,
    /// Library integration that imported the game, if any.
    #[serde(default, alias = "PluginId")]
    pub source_plugin_id: Option<String>,
}

impl GameRecord {
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name == name)
    }

    pub fn is_pc_game(&self) -> bool {
        if self.platforms.is_empty() {
            tracing::info!(game = %self.name, "Game doesn't have platforms set");
            return false;
        }

        let is_pc = self.platforms.iter().any(|p| {
            p.name == PC_PLATFORM_NAME
                || p.specification_id.as_deref() == Some(PC_PLATFORM_SPEC_ID)
        });
        if !is_pc {
            tracing::info!(game = %self.name, "Game is not PC platform");
        }
        is_pc
    }

    /// Install directory, only when it is set and exists on disk.
    pub fn valid_install_dir(&self) -> Option<&Path> {
        self.install_directory
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty() && dir.is_dir())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Host Context
// ═══════════════════════════════════════════════════════════════════════════════

/// How the launcher is currently presented. Fullscreen is treated as
/// unattended: nobody is expected to answer a chooser dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostMode {
    #[default]
    Desktop,
    Fullscreen,
}

impl HostMode {
    pub fn is_background(self) -> bool {
        matches!(self, HostMode::Fullscreen)
    }
}
