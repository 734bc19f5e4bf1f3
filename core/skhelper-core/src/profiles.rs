//! Helper service profile and ReShade configuration.
//!
//! The service copies `Global/default_SpecialK.ini` whenever it creates a
//! profile for a game it hasn't seen before, so the user's "on new profiles"
//! settings are merged into that file before every launch. ReShade gets a
//! per-game preset and a `ReShade.ini` pointing at it.

use fs_err as fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{HelperError, Result};
use crate::ini::{sync_file, IniPatch};
use crate::patterns::RE_RESHADE_TECHNIQUE;
use crate::settings::Settings;
use crate::storage::Layout;

const RESHADE64_FILENAME: &str = r"..\..\PlugIns\ThirdParty\ReShade\ReShade64.dll";
const RESHADE32_FILENAME: &str = r"..\..\PlugIns\ThirdParty\ReShade\ReShade32.dll";

/// Preset written when no shader declares a technique.
const EMPTY_RESHADE_PRESET: &str = "PreprocessorDefinitions=\nTechniques=\nTechniqueSorting=\n";

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "true"
    } else {
        "false"
    }
}

/// Entries the default profile must hold for the given settings.
pub fn default_profile_patch(settings: &Settings) -> Vec<IniPatch> {
    let mut patch = vec![IniPatch::new(
        "Steam.System",
        "PreLoadSteamOverlay",
        flag(settings.enable_steam_overlay_on_new_profiles),
    )];

    if settings.enable_reshade_on_new_profiles {
        patch.extend([
            IniPatch::new("Render.FrameRate", "SleeplessRenderThread", "false"),
            IniPatch::new("Render.OSD", "ShowInVideoCapture", "false"),
            IniPatch::new("Import.ReShade64", "Architecture", "x64"),
            IniPatch::new("Import.ReShade64", "Role", "ThirdParty"),
            IniPatch::new("Import.ReShade64", "When", "PlugIn"),
            IniPatch::new("Import.ReShade64", "Filename", RESHADE64_FILENAME),
            IniPatch::new("Import.ReShade32", "Architecture", "Win32"),
            IniPatch::new("Import.ReShade32", "Role", "ThirdParty"),
            IniPatch::new("Import.ReShade32", "When", "PlugIn"),
            IniPatch::new("Import.ReShade32", "Filename", RESHADE32_FILENAME),
        ]);
    } else {
        patch.extend([
            IniPatch::new("Import.ReShade64", "Filename", ""),
            IniPatch::new("Import.ReShade32", "Filename", ""),
        ]);
    }

    let target_fps = if settings.set_default_fps_on_new_profiles && settings.default_fps_limit != 0
    {
        settings.default_fps_limit.to_string()
    } else {
        "0.0".to_string()
    };

    patch.extend([
        IniPatch::new("Render.FrameRate", "TargetFPS", target_fps),
        IniPatch::new(
            "Compatibility.General",
            "DisableBloatWare_NVIDIA",
            flag(settings.disable_nvidia_bloatware_on_new_profiles),
        ),
        IniPatch::new(
            "Render.DXGI",
            "UseFlipDiscard",
            flag(settings.use_flip_model_on_new_profiles),
        ),
    ]);

    patch
}

/// Creates the default profile when missing and merges the settings into it.
/// Returns the number of changed entries.
pub fn validate_default_profile(layout: &Layout, settings: &Settings) -> Result<usize> {
    sync_file(
        &layout.default_profile(),
        &default_profile_patch(settings),
        true,
    )
}

/// Records the catalog id in the default profile so profiles created for the
/// game inherit it. Does nothing when the default profile doesn't exist.
pub fn set_profile_app_id(layout: &Layout, catalog_id: &str) -> Result<bool> {
    let path = layout.default_profile();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Default profile missing, AppID not set");
        return Ok(false);
    }

    let patch = [IniPatch::new("Steam.System", "AppID", catalog_id)];
    Ok(sync_file(&path, &patch, false)? > 0)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ReShade
// ═══════════════════════════════════════════════════════════════════════════════

/// Builds the `TechniqueSorting` value: the first technique of every `.fx`
/// file under `shaders_dir`, as `Name@File.fx`, sorted ordinally and joined
/// with commas. Empty when the directory is missing or declares nothing.
pub fn technique_sorting(shaders_dir: &Path) -> String {
    if !shaders_dir.is_dir() {
        tracing::warn!(path = %shaders_dir.display(), "ReShade shaders directory not found");
        return String::new();
    }

    let mut techniques: Vec<String> = WalkDir::new(shaders_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("fx"))
        })
        .filter_map(|entry| {
            let bytes = match fs::read(entry.path()) {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to read shader file");
                    return None;
                }
            };
            let source = String::from_utf8_lossy(&bytes);
            let technique = RE_RESHADE_TECHNIQUE.captures(&source)?.get(1)?.as_str();
            Some(format!(
                "{}@{}",
                technique,
                entry.file_name().to_string_lossy()
            ))
        })
        .collect();

    techniques.sort();
    techniques.join(",")
}

/// Writes the game's preset when it doesn't exist yet. Returns whether a
/// preset was created.
pub fn ensure_game_preset(layout: &Layout, game_id: &str) -> Result<bool> {
    let preset = layout.reshade_preset(game_id);
    if preset.exists() {
        return Ok(false);
    }

    if let Some(parent) = preset.parent() {
        fs::create_dir_all(parent).map_err(|e| HelperError::persistence(parent, e))?;
    }

    let sorting = technique_sorting(&layout.reshade_shaders_dir());
    let content = if sorting.is_empty() {
        EMPTY_RESHADE_PRESET.to_string()
    } else {
        format!(
            "PreprocessorDefinitions=\nTechniques=\nTechniqueSorting={}",
            sorting
        )
    };

    fs::write(&preset, content).map_err(|e| HelperError::persistence(&preset, e))?;
    tracing::info!(path = %preset.display(), "Created ReShade preset for game");
    Ok(true)
}

/// Entries `ReShade.ini` must hold for the game's preset to load.
pub fn reshade_ini_patch(layout: &Layout, game_id: &str) -> Vec<IniPatch> {
    vec![
        IniPatch::new(
            "GENERAL",
            "PresetPath",
            format!(r".\{}", layout.reshade_preset_subpath(game_id)),
        ),
        IniPatch::new("APP", "ForceVSync", "0"),
        IniPatch::new("APP", "ForceWindowed", "0"),
        IniPatch::new("APP", "ForceFullscreen", "0"),
        IniPatch::new("APP", "ForceResolution", "0,0"),
        IniPatch::new("APP", "Force10BitFormat", "0"),
    ]
}

/// Ensures the game's preset and points `ReShade.ini` at it. `ReShade.ini`
/// is only patched when ReShade is installed. Returns the number of changed
/// `ReShade.ini` entries.
pub fn validate_reshade_configuration(layout: &Layout, game_id: &str) -> Result<usize> {
    ensure_game_preset(layout, game_id)?;

    let reshade_ini = layout.reshade_ini();
    if !reshade_ini.exists() {
        tracing::debug!(path = %reshade_ini.display(), "ReShade.ini not found, skipping");
        return Ok(0);
    }

    sync_file(&reshade_ini, &reshade_ini_patch(layout, game_id), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::IniDocument;
    use tempfile::TempDir;

    fn layout(temp: &TempDir) -> Layout {
        Layout::with_roots(
            temp.path().join("data"),
            temp.path().join("sk"),
            temp.path().join("win"),
        )
    }

    fn value<'a>(patch: &'a [IniPatch], section: &str, key: &str) -> Option<&'a str> {
        patch
            .iter()
            .find(|p| p.section == section && p.key == key)
            .map(|p| p.value.as_str())
    }

    #[test]
    fn test_default_patch_with_defaults() {
        let patch = default_profile_patch(&Settings::default());
        assert_eq!(patch.len(), 6);
        assert_eq!(value(&patch, "Steam.System", "PreLoadSteamOverlay"), Some("false"));
        assert_eq!(value(&patch, "Import.ReShade64", "Filename"), Some(""));
        assert_eq!(value(&patch, "Import.ReShade32", "Filename"), Some(""));
        assert_eq!(value(&patch, "Render.FrameRate", "TargetFPS"), Some("0.0"));
        assert_eq!(value(&patch, "Import.ReShade64", "Role"), None);
    }

    #[test]
    fn test_default_patch_with_reshade_and_fps() {
        let settings = Settings {
            enable_reshade_on_new_profiles: true,
            set_default_fps_on_new_profiles: true,
            default_fps_limit: 144,
            use_flip_model_on_new_profiles: true,
            ..Default::default()
        };
        let patch = default_profile_patch(&settings);
        assert_eq!(value(&patch, "Import.ReShade64", "Architecture"), Some("x64"));
        assert_eq!(value(&patch, "Import.ReShade32", "Architecture"), Some("Win32"));
        assert_eq!(
            value(&patch, "Import.ReShade32", "Filename"),
            Some(r"..\..\PlugIns\ThirdParty\ReShade\ReShade32.dll")
        );
        assert_eq!(value(&patch, "Render.FrameRate", "TargetFPS"), Some("144"));
        assert_eq!(value(&patch, "Render.DXGI", "UseFlipDiscard"), Some("true"));
    }

    #[test]
    fn test_fps_limit_zero_means_unlimited() {
        let settings = Settings {
            set_default_fps_on_new_profiles: true,
            default_fps_limit: 0,
            ..Default::default()
        };
        let patch = default_profile_patch(&settings);
        assert_eq!(value(&patch, "Render.FrameRate", "TargetFPS"), Some("0.0"));
    }

    #[test]
    fn test_validate_default_profile_creates_then_settles() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);

        assert_eq!(validate_default_profile(&layout, &Settings::default()).unwrap(), 6);
        assert_eq!(validate_default_profile(&layout, &Settings::default()).unwrap(), 0);
        assert!(layout.default_profile().exists());
    }

    #[test]
    fn test_set_profile_app_id_requires_existing_profile() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        assert!(!set_profile_app_id(&layout, "620").unwrap());
        assert!(!layout.default_profile().exists());

        validate_default_profile(&layout, &Settings::default()).unwrap();
        assert!(set_profile_app_id(&layout, "620").unwrap());
        assert!(!set_profile_app_id(&layout, "620").unwrap());

        let doc = IniDocument::load(&layout.default_profile()).unwrap();
        assert_eq!(doc.get("Steam.System", "AppID"), Some("620"));
    }

    #[test]
    fn test_technique_sorting_scans_recursively() {
        let temp = TempDir::new().unwrap();
        let shaders = temp.path().join("Shaders");
        std::fs::create_dir_all(shaders.join("Legacy")).unwrap();
        std::fs::write(shaders.join("SMAA.fx"), "technique SMAA\n{\n}\n").unwrap();
        std::fs::write(
            shaders.join("Legacy").join("Clarity.fx"),
            "// tone\ntechnique Clarity <ui_tooltip=\"x\";>\ntechnique Second\n",
        )
        .unwrap();
        std::fs::write(shaders.join("ReShade.fxh"), "technique Ignored\n").unwrap();
        std::fs::write(shaders.join("Empty.fx"), "// nothing\n").unwrap();

        assert_eq!(technique_sorting(&shaders), "Clarity@Clarity.fx,SMAA@SMAA.fx");
    }

    #[test]
    fn test_technique_sorting_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert_eq!(technique_sorting(&temp.path().join("missing")), "");
    }

    #[test]
    fn test_ensure_game_preset_written_once() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        let shaders = layout.reshade_shaders_dir();
        std::fs::create_dir_all(&shaders).unwrap();
        std::fs::write(shaders.join("Vignette.fx"), "technique Vignette\n").unwrap();

        assert!(ensure_game_preset(&layout, "game-1").unwrap());
        let preset = layout.reshade_preset("game-1");
        assert_eq!(
            std::fs::read_to_string(&preset).unwrap(),
            "PreprocessorDefinitions=\nTechniques=\nTechniqueSorting=Vignette@Vignette.fx"
        );

        std::fs::write(&preset, "Techniques=Vignette@Vignette.fx\n").unwrap();
        assert!(!ensure_game_preset(&layout, "game-1").unwrap());
        assert_eq!(
            std::fs::read_to_string(&preset).unwrap(),
            "Techniques=Vignette@Vignette.fx\n"
        );
    }

    #[test]
    fn test_ensure_game_preset_without_shaders_uses_empty_preset() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);
        assert!(ensure_game_preset(&layout, "game-2").unwrap());
        assert_eq!(
            std::fs::read_to_string(layout.reshade_preset("game-2")).unwrap(),
            EMPTY_RESHADE_PRESET
        );
    }

    #[test]
    fn test_validate_reshade_configuration() {
        let temp = TempDir::new().unwrap();
        let layout = layout(&temp);

        // No ReShade.ini: preset still created, nothing patched.
        assert_eq!(validate_reshade_configuration(&layout, "game-3").unwrap(), 0);
        assert!(layout.reshade_preset("game-3").exists());

        std::fs::write(layout.reshade_ini(), "[APP]\nForceVSync=1\nForceWindowed=0\n").unwrap();
        assert_eq!(validate_reshade_configuration(&layout, "game-3").unwrap(), 5);
        assert_eq!(validate_reshade_configuration(&layout, "game-3").unwrap(), 0);

        let doc = IniDocument::load(&layout.reshade_ini()).unwrap();
        assert_eq!(
            doc.get("GENERAL", "PresetPath"),
            Some(r".\reshade-presets\game-3.ini")
        );
        assert_eq!(doc.get("APP", "ForceResolution"), Some("0,0"));
    }
}
