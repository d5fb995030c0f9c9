//! Configuration module
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::info;

/// Global settings instance
static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "HASONE_SETTINGS_PATH";

/// Initialize global settings
pub fn init(settings: Settings) -> Result<&'static Settings> {
    SETTINGS
        .set(settings)
        .map_err(|_| anyhow::anyhow!("Settings already initialized"))?;
    Ok(get())
}

/// Get a reference to the global settings, falling back to defaults
pub fn get() -> &'static Settings {
    SETTINGS.get_or_init(Settings::default)
}

/// Check if settings have been initialized
pub fn is_initialized() -> bool {
    SETTINGS.get().is_some()
}

/// Default settings file locations, in lookup order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/hasone-autocomplete/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("hasone-autocomplete/settings.yml"));
    }
    paths
}

/// Load settings from an explicit path, the env var, a default location, or defaults
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let env_path = std::env::var(SETTINGS_PATH_ENV).ok().map(PathBuf::from);

    let candidates = explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(env_path)
        .chain(default_paths());

    for path in candidates {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}
