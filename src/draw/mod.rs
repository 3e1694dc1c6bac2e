//! Rendering primitives for the annotation board (Cairo-based).
//!
//! This module defines the drawing layer of the board:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`SurfaceManager`]: owner of the background and ink surfaces
//! - [`StrokeRenderer`]: incremental freehand segment painting
//! - [`flatten`]: compositing both layers for PNG export
//! - Display helpers for the composed board, empty state and eraser cursor

pub mod color;
pub mod export;
pub mod render;
pub mod stroke;
pub mod surface;

// Re-export commonly used types at module level
pub use color::Color;
pub use export::{FlattenedImage, encode_png_async, flatten};
pub use render::{render_empty_state, render_eraser_preview, render_layers};
pub use stroke::{StrokeRenderer, render_segment};
pub use surface::{Layer, SurfaceManager, pixel_alpha, pixel_rgb};

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
