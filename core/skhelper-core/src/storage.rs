//! Path management for skhelper.
//!
//! Every file the lifecycle reads or writes is derived from three roots:
//!
//! - `data_dir`: our own per-user data (settings, attempt records, logs,
//!   notifications). Default: `<platform data dir>/skhelper`.
//! - `sk_root`: the helper service installation (`Documents/My Mods/SpecialK`),
//!   which also holds the default profile and the ReShade plug-in.
//! - `system_root`: the Windows directory used to locate `rundll32.exe`.
//!
//! Production code uses [`Layout::from_env`]; tests use [`Layout::with_roots`]
//! pointed at temp directories.

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{HelperError, Result};

const DATA_DIR_ENV: &str = "SKHELPER_DATA_DIR";
const SK_ROOT_ENV: &str = "SKHELPER_SK_ROOT";
const SYSTEM_ROOT_ENV: &str = "SKHELPER_SYSTEM_ROOT";
const DEFAULT_SYSTEM_ROOT: &str = r"C:\Windows";

#[derive(Debug, Clone)]
pub struct Layout {
    data_dir: PathBuf,
    sk_root: PathBuf,
    system_root: PathBuf,
}

impl Layout {
    /// Resolves the roots from environment overrides, falling back to the
    /// platform directories. Returns `None` when no home/documents directory
    /// can be determined and no override is set.
    pub fn from_env() -> Option<Self> {
        let data_dir = match env::var_os(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()?.join("skhelper"),
        };

        let sk_root = match env::var_os(SK_ROOT_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::document_dir()?.join("My Mods").join("SpecialK"),
        };

        let system_root = env::var_os(SYSTEM_ROOT_ENV)
            .or_else(|| env::var_os("SystemRoot"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSTEM_ROOT));

        Some(Self {
            data_dir,
            sk_root,
            system_root,
        })
    }

    pub fn with_roots(data_dir: PathBuf, sk_root: PathBuf, system_root: PathBuf) -> Self {
        Self {
            data_dir,
            sk_root,
            system_root,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn sk_root(&self) -> &Path {
        &self.sk_root
    }

    pub fn system_root(&self) -> &Path {
        &self.system_root
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Our Files
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    pub fn notifications_file(&self) -> PathBuf {
        self.data_dir.join("notifications.json")
    }

    /// Directory holding one attempt record per game.
    pub fn attempts_dir(&self) -> PathBuf {
        self.data_dir.join("attempts")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Helper Service Files
    // ─────────────────────────────────────────────────────────────────────────────

    /// Profile copied by the service whenever it creates a profile for a new game.
    pub fn default_profile(&self) -> PathBuf {
        self.sk_root.join("Global").join("default_SpecialK.ini")
    }

    pub fn reshade_base(&self) -> PathBuf {
        self.sk_root
            .join("PlugIns")
            .join("ThirdParty")
            .join("ReShade")
    }

    pub fn reshade_ini(&self) -> PathBuf {
        self.reshade_base().join("ReShade.ini")
    }

    pub fn reshade_shaders_dir(&self) -> PathBuf {
        self.reshade_base().join("reshade-shaders").join("Shaders")
    }

    /// Preset path relative to the ReShade base, as written into `ReShade.ini`.
    pub fn reshade_preset_subpath(&self, game_id: &str) -> String {
        format!(r"reshade-presets\{}.ini", sanitize_file_name(game_id))
    }

    pub fn reshade_preset(&self, game_id: &str) -> PathBuf {
        self.reshade_base()
            .join("reshade-presets")
            .join(format!("{}.ini", sanitize_file_name(game_id)))
    }
}

/// Makes an opaque identifier safe to use as a single path component.
pub(crate) fn sanitize_file_name(id: &str) -> String {
    let cleaned: String = id
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Writes content to a file atomically using temp file + rename in the same
/// directory. The parent directory must exist.
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| HelperError::persistence(path, e))?;

    tmp.write_all(contents)
        .and_then(|_| tmp.flush())
        .map_err(|e| HelperError::persistence(path, e))?;

    tmp.persist(path)
        .map_err(|e| HelperError::persistence(path, e.error))?;

    Ok(())
}
