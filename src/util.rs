//! Utility functions for colors, surface geometry and paths.
//!
//! This module provides:
//! - Color name mapping used by the configuration system
//! - Aspect-ratio fitting of the board to its container width
//! - Tilde expansion for configured paths

use crate::draw::{Color, color::*};
use std::path::PathBuf;

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

/// Maps a Color value to its human-readable name.
///
/// Uses approximate matching (threshold-based) to identify colors.
/// Returns "Custom" for anything that is not close to a predefined color.
pub fn color_to_name(color: &Color) -> &'static str {
    // Match colors approximately with 0.1 tolerance
    if color.r > 0.9 && color.g < 0.1 && color.b < 0.1 {
        "Red"
    } else if color.r < 0.1 && color.g > 0.9 && color.b < 0.1 {
        "Green"
    } else if color.r < 0.1 && color.g < 0.1 && color.b > 0.9 {
        "Blue"
    } else if color.r > 0.9 && color.g > 0.9 && color.b < 0.1 {
        "Yellow"
    } else if color.r > 0.9 && (0.4..=0.6).contains(&color.g) && color.b < 0.1 {
        "Orange"
    } else if color.r > 0.9 && color.g < 0.1 && color.b > 0.9 {
        "Pink"
    } else if color.r > 0.9 && color.g > 0.9 && color.b > 0.9 {
        "White"
    } else if color.r < 0.1 && color.g < 0.1 && color.b < 0.1 {
        "Black"
    } else {
        "Custom"
    }
}

// ============================================================================
// Geometry Utilities
// ============================================================================

/// Computes the intrinsic aspect ratio (width / height) of an image.
///
/// Degenerate heights fall back to a square ratio.
pub fn aspect_ratio(width: i32, height: i32) -> f64 {
    if width <= 0 || height <= 0 {
        return 1.0;
    }
    width as f64 / height as f64
}

/// Fits a surface to the container width while keeping the aspect ratio.
///
/// Returns `(width, height)` in pixels with `height = round(width / aspect)`.
/// Both dimensions are at least one pixel.
pub fn fit_to_width(container_width: u32, aspect: f64) -> (i32, i32) {
    let width = container_width.clamp(1, i32::MAX as u32) as i32;
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    };
    let height = (width as f64 / aspect).round().max(1.0) as i32;
    (width, height)
}

// ============================================================================
// Paths
// ============================================================================

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
