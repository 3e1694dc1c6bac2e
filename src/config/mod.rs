//! Configuration file support for drawbox.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/drawbox/config.toml`. Settings include toolbar defaults,
//! the board container size, storage locations and the available board profiles.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::ColorSpec;
pub use types::{BoardProfile, CanvasConfig, DrawingConfig, StorageConfig};

use crate::input::style::{MAX_ERASER_DIAMETER, MIN_ERASER_DIAMETER};
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// line_color = "#000000"
/// pen_width = 2.0
/// eraser_diameter = 20.0
///
/// [canvas]
/// container_width = 1024
/// eraser_preview = true
///
/// [storage]
/// directory = "~/Pictures/Drawbox"
///
/// [boards.sixtypes]
/// background = "sixtypes.png"
/// bucket = "sixtypes"
/// table = "sixtypes"
/// ```
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Toolbar defaults (line color, pen width, eraser size)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Board surface settings
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Local image store and record sink locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Board profiles keyed by name
    #[serde(default = "types::default_boards")]
    pub boards: BTreeMap<String, BoardProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drawing: DrawingConfig::default(),
            canvas: CanvasConfig::default(),
            storage: StorageConfig::default(),
            boards: types::default_boards(),
        }
    }
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `pen_width`: 1.0 - 20.0
    /// - `eraser_diameter`: 5.0 - 50.0
    /// - `container_width`: 1 - 8192
    fn validate_and_clamp(&mut self) {
        // Pen width: 1.0 - 20.0
        if !(1.0..=20.0).contains(&self.drawing.pen_width) {
            log::warn!(
                "Invalid pen_width {:.1}, clamping to 1.0-20.0 range",
                self.drawing.pen_width
            );
            self.drawing.pen_width = if self.drawing.pen_width.is_nan() {
                crate::input::style::DEFAULT_PEN_WIDTH
            } else {
                self.drawing.pen_width.clamp(1.0, 20.0)
            };
        }

        // Eraser diameter: 5.0 - 50.0
        if !(MIN_ERASER_DIAMETER..=MAX_ERASER_DIAMETER).contains(&self.drawing.eraser_diameter) {
            log::warn!(
                "Invalid eraser_diameter {:.1}, clamping to {:.0}-{:.0} range",
                self.drawing.eraser_diameter,
                MIN_ERASER_DIAMETER,
                MAX_ERASER_DIAMETER
            );
            self.drawing.eraser_diameter = if self.drawing.eraser_diameter.is_nan() {
                crate::input::style::DEFAULT_ERASER_DIAMETER
            } else {
                self.drawing
                    .eraser_diameter
                    .clamp(MIN_ERASER_DIAMETER, MAX_ERASER_DIAMETER)
            };
        }

        // Container width: 1 - 8192
        if !(1..=8192).contains(&self.canvas.container_width) {
            log::warn!(
                "Invalid container_width {}, clamping to 1-8192 range",
                self.canvas.container_width
            );
            self.canvas.container_width = self.canvas.container_width.clamp(1, 8192);
        }

        // Drop profiles that cannot be saved anywhere
        self.boards.retain(|name, profile| {
            let valid = !profile.bucket.trim().is_empty() && !profile.table.trim().is_empty();
            if !valid {
                log::warn!("Board '{}' has an empty bucket or table; ignoring it", name);
            }
            valid
        });
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/drawbox/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("drawbox");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if it does not exist.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        // Keep validation after logging so warnings follow the load message
        config.validate_and_clamp();
        Ok(config)
    }

    /// Parses a TOML document without validation.
    fn from_toml(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Looks up a board profile by name.
    pub fn board(&self, name: &str) -> Option<&BoardProfile> {
        self.boards.get(name)
    }

    /// Saves the current configuration to `config_path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
