use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::{AppConfig, ConfigError, Result};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// File the values came from; `None` means built-in defaults.
    pub path: Option<PathBuf>,
    /// Set when the default file exists but could not be used.
    pub warning: Option<String>,
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "umlview", "umlview")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let config = if extension == "json" {
        serde_json::from_str::<AppConfig>(&raw)?
    } else {
        toml::from_str::<AppConfig>(&raw)?
    };
    Ok(config)
}

/// Loads `explicit` strictly, or the per-user file leniently.
///
/// A broken per-user file degrades to defaults and reports why in
/// [`LoadedConfig::warning`]; an explicitly named file must load.
pub fn load_or_default(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        return Ok(LoadedConfig {
            config: load_config(path)?,
            path: Some(path.to_path_buf()),
            warning: None,
        });
    }

    let Some(path) = default_config_path() else {
        return Ok(LoadedConfig::default());
    };
    if !path.is_file() {
        return Ok(LoadedConfig::default());
    }

    match load_config(&path) {
        Ok(config) => Ok(LoadedConfig {
            config,
            path: Some(path),
            warning: None,
        }),
        Err(error) => Ok(LoadedConfig {
            config: AppConfig::default(),
            path: None,
            warning: Some(format!(
                "ignoring configuration at {}: {error}",
                path.display()
            )),
        }),
    }
}

pub fn to_toml_string(config: &AppConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
