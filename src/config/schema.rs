//! Configuration schema types for `mctex.toml`
//!
//! Defines the structure and validation rules for mctex configuration.

use serde::{Deserialize, Serialize};

use crate::color::parse_color;
use crate::editor::{EditorOptions, DEFAULT_PIXEL_SIZE};
use crate::exporter::{ExportOptions, DEFAULT_DESCRIPTION};
use crate::versions::DEFAULT_VERSION_LABEL;

/// Largest accepted editor cell size
pub const MAX_PIXEL_SIZE: u32 = 64;

/// Resource-pack output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackConfig {
    /// Minecraft version label used for `pack_format`
    #[serde(default = "default_version")]
    pub version: String,
    /// Description written to `pack.mcmeta`
    #[serde(default = "default_description")]
    pub description: String,
    /// Fail on unknown version labels instead of using the newest format
    #[serde(default)]
    pub strict_version: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            description: default_description(),
            strict_version: false,
        }
    }
}

fn default_version() -> String {
    DEFAULT_VERSION_LABEL.to_string()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

/// Pixel editor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Canvas pixels per texture pixel
    #[serde(default = "default_pixel_size")]
    pub pixel_size: u32,
    /// Cell outline color
    #[serde(default = "default_grid_color")]
    pub grid_color: String,
    /// Paint color when a session opens
    #[serde(default = "default_color")]
    pub default_color: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pixel_size: default_pixel_size(),
            grid_color: default_grid_color(),
            default_color: default_color(),
        }
    }
}

fn default_pixel_size() -> u32 {
    DEFAULT_PIXEL_SIZE
}

fn default_grid_color() -> String {
    "#A0A0A4".to_string()
}

fn default_color() -> String {
    "#000000".to_string()
}

/// Complete mctex.toml configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MctexConfig {
    #[serde(default)]
    pub pack: PackConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "editor.pixel_size")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mctex.toml: '{}' {}", self.field, self.message)
    }
}

impl MctexConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.pack.description.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "pack.description".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        if self.editor.pixel_size == 0 || self.editor.pixel_size > MAX_PIXEL_SIZE {
            errors.push(ConfigValidationError {
                field: "editor.pixel_size".to_string(),
                message: format!("must be between 1 and {}", MAX_PIXEL_SIZE),
            });
        }

        for (field, value) in [
            ("editor.grid_color", &self.editor.grid_color),
            ("editor.default_color", &self.editor.default_color),
        ] {
            if let Err(e) = parse_color(value) {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: format!("is not a color ({})", e),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Editor options for new sessions.
    ///
    /// Colors that fail to parse fall back to the built-in defaults; call
    /// [`MctexConfig::validate`] first to report them.
    pub fn editor_options(&self) -> EditorOptions {
        let defaults = EditorOptions::default();
        EditorOptions {
            pixel_size: self.editor.pixel_size,
            grid_color: parse_color(&self.editor.grid_color).unwrap_or(defaults.grid_color),
            initial_color: parse_color(&self.editor.default_color)
                .unwrap_or(defaults.initial_color),
        }
    }

    /// Export options for the configured pack settings.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            version_label: self.pack.version.clone(),
            description: self.pack.description.clone(),
            strict_version: self.pack.strict_version,
        }
    }
}
