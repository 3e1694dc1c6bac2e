//! Configuration enum types.

use crate::draw::{BLACK, Color};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - a named color, a hex string, or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// line_color = "red"
///
/// # Color-picker hex value
/// line_color = "#ff8000"
///
/// # Custom RGB color (0-255 per component)
/// line_color = [255, 128, 0]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (red, green, blue, yellow, orange, pink, white, black) or `#rrggbb`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`] struct.
    ///
    /// Strings starting with `#` are parsed as hex, other strings are looked up
    /// with `util::name_to_color()`. Anything unrecognized defaults to black
    /// with a warning.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) if name.trim_start().starts_with('#') => {
                Color::from_hex(name).unwrap_or_else(|| {
                    warn!("Invalid hex color '{}', using black", name);
                    BLACK
                })
            }
            ColorSpec::Name(name) => crate::util::name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using black", name);
                BLACK
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgb8(*r, *g, *b),
        }
    }
}
