//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Drawing-related settings.
///
/// Controls the toolbar state when a board first opens. Users can change the
/// color, mode and eraser size at runtime.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Initial line color - a named color, a `#rrggbb` hex string, or an RGB
    /// array like `[255, 0, 0]`
    #[serde(default = "default_line_color")]
    pub line_color: ColorSpec,

    /// Ink stroke width in pixels (valid range: 1.0 - 20.0)
    #[serde(default = "default_pen_width")]
    pub pen_width: f64,

    /// Initial eraser diameter in pixels (valid range: 5.0 - 50.0)
    #[serde(default = "default_eraser_diameter")]
    pub eraser_diameter: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            line_color: default_line_color(),
            pen_width: default_pen_width(),
            eraser_diameter: default_eraser_diameter(),
        }
    }
}

/// Board surface settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Width of the board container in pixels; the height follows the
    /// background's aspect ratio
    #[serde(default = "default_container_width")]
    pub container_width: u32,

    /// Show a disc the size of the eraser under the cursor while erasing
    #[serde(default = "default_eraser_preview")]
    pub eraser_preview: bool,

    /// Directory that relative background paths are resolved against
    #[serde(default = "default_asset_dir")]
    pub asset_dir: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            container_width: default_container_width(),
            eraser_preview: default_eraser_preview(),
            asset_dir: default_asset_dir(),
        }
    }
}

/// Where saved boards and their records are written by the local backends.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StorageConfig {
    /// Root directory for uploaded images (one subdirectory per bucket)
    #[serde(default = "default_storage_directory")]
    pub directory: String,

    /// JSON-lines file that receives one record per saved image
    #[serde(default = "default_records_file")]
    pub records_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: default_storage_directory(),
            records_file: default_records_file(),
        }
    }
}

/// One assessment board: which background to draw on and where results go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BoardProfile {
    /// Background image: a path (relative to `canvas.asset_dir`) or `file://` URL
    pub background: String,

    /// Storage bucket the exported PNG is uploaded to
    pub bucket: String,

    /// Record table that links the uploaded image to a participant
    pub table: String,
}

impl BoardProfile {
    pub fn new(background: &str, bucket: &str, table: &str) -> Self {
        Self {
            background: background.to_string(),
            bucket: bucket.to_string(),
            table: table.to_string(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_line_color() -> ColorSpec {
    ColorSpec::Name("#000000".to_string())
}

fn default_pen_width() -> f64 {
    crate::input::style::DEFAULT_PEN_WIDTH
}

fn default_eraser_diameter() -> f64 {
    crate::input::style::DEFAULT_ERASER_DIAMETER
}

fn default_container_width() -> u32 {
    1024
}

fn default_eraser_preview() -> bool {
    true
}

fn default_asset_dir() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("drawbox").join("assets"))
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_else(|| "assets".to_string())
}

fn default_storage_directory() -> String {
    "~/Pictures/Drawbox".to_string()
}

fn default_records_file() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("drawbox").join("records.jsonl"))
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records.jsonl".to_string())
}

pub(super) fn default_boards() -> BTreeMap<String, BoardProfile> {
    let mut boards = BTreeMap::new();
    boards.insert(
        "sixtypes".to_string(),
        BoardProfile::new("sixtypes.png", "sixtypes", "sixtypes"),
    );
    boards.insert(
        "lifegraph".to_string(),
        BoardProfile::new("lifegraph.png", "lifegraph", "lifegraphs"),
    );
    boards
}
