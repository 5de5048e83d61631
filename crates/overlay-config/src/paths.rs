//! Where settings live on disk.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

/// Application name used for the settings folder.
pub const APP_NAME: &str = "Multi-Overlay";

/// Environment variable that overrides the settings directory.
pub const HOME_ENV: &str = "MULTI_OVERLAY_HOME";

/// File name of the persisted hotkey table.
pub const HOTKEYS_FILE: &str = "hotkeys.json";

/// Directory holding overlay declaration files.
pub const OVERLAYS_DIR: &str = "overlays";

/// `~/Library/Application Support/Multi-Overlay`.
pub fn default_settings_dir() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push("Library");
    p.push("Application Support");
    p.push(APP_NAME);
    p
}

/// Resolve the settings directory.
///
/// Policy:
/// 1) Use `explicit` when provided.
/// 2) Else use `$MULTI_OVERLAY_HOME` when set and non-empty.
/// 3) Else use [`default_settings_dir`].
pub fn settings_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env::var_os(HOME_ENV) {
        Some(v) if !v.is_empty() => PathBuf::from(v),
        _ => default_settings_dir(),
    }
}

/// The hotkey file inside `settings`.
pub fn hotkeys_path(settings: &Path) -> PathBuf {
    settings.join(HOTKEYS_FILE)
}

/// The declaration directory inside `settings`.
pub fn overlays_dir(settings: &Path) -> PathBuf {
    settings.join(OVERLAYS_DIR)
}

/// Create the settings and declaration directories if needed.
pub fn ensure_dirs(settings: &Path) -> Result<()> {
    let dir = overlays_dir(settings);
    fs::create_dir_all(&dir).map_err(|e| Error::Write {
        path: dir,
        message: e.to_string(),
    })
}
