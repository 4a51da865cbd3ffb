//! User configuration loading for language-sniffer.
//!
//! User config location: $XDG_CONFIG_HOME/language-sniffer/language-sniffer.toml
//! Fallback: the platform config directory (e.g. ~/.config on Linux).

use super::settings::SnifferSettings;
use crate::error::SnifferResult;
use log::debug;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "language-sniffer";
const CONFIG_FILE: &str = "language-sniffer.toml";

/// Returns the path to the user configuration file.
///
/// The path is determined by:
/// 1. If $XDG_CONFIG_HOME is set: $XDG_CONFIG_HOME/language-sniffer/language-sniffer.toml
/// 2. Otherwise: `dirs::config_dir()`/language-sniffer/language-sniffer.toml
///
/// Returns None if no config directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    Some(base.join(APP_DIR).join(CONFIG_FILE))
}

/// Load settings from a TOML file.
pub fn load_config_file(path: &Path) -> SnifferResult<SnifferSettings> {
    let text = std::fs::read_to_string(path)?;
    SnifferSettings::from_toml_str(&text)
}

/// Write settings to a TOML file, creating parent directories.
pub fn save_config_file(path: &Path, settings: &SnifferSettings) -> SnifferResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, settings.to_toml_string()?)?;
    Ok(())
}

/// Load the user configuration, if a user config file exists.
pub fn load_user_config() -> SnifferResult<Option<SnifferSettings>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.is_file() {
        debug!("no user config at {}", path.display());
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}
