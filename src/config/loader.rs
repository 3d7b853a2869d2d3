//! Configuration loading and discovery for `mctex.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::MctexConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name searched for in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = "mctex.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse mctex.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the Minecraft version label
    pub version: Option<String>,
    /// Override the pack description
    pub description: Option<String>,
    /// Override strict version checking
    pub strict_version: Option<bool>,
    /// Override the editor cell size
    pub pixel_size: Option<u32>,
}

/// Find mctex.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for mctex.toml
/// 2. Check XDG_CONFIG_HOME/mctex/mctex.toml (or ~/.config/mctex/mctex.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find mctex.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("mctex").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find mctex.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file (it must exist). Otherwise
/// uses [`find_config`]; when nothing is found the defaults are returned.
pub fn load_config(path: Option<&Path>) -> Result<MctexConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("Loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(MctexConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<MctexConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: MctexConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut MctexConfig, overrides: &CliOverrides) {
    if let Some(ref version) = overrides.version {
        config.pack.version = version.clone();
    }

    if let Some(ref description) = overrides.description {
        config.pack.description = description.clone();
    }

    if let Some(strict) = overrides.strict_version {
        config.pack.strict_version = strict;
    }

    if let Some(size) = overrides.pixel_size {
        config.editor.pixel_size = size;
    }
}
