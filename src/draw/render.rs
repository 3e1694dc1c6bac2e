//! Cairo-based display composition for the board.

use super::color::Color;
use cairo::{Context, ImageSurface};

/// Fill used for the eraser preview disc.
const ERASER_PREVIEW_FILL: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 0.7,
};

/// Outline used for the eraser preview disc.
const ERASER_PREVIEW_OUTLINE: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Neutral fill shown while no background is available.
const EMPTY_STATE_FILL: Color = Color {
    r: 0.96,
    g: 0.96,
    b: 0.96,
    a: 1.0,
};

/// Paints the background layer followed by the ink layer.
///
/// The ink is always drawn on top so erased regions reveal the background.
pub fn render_layers(ctx: &Context, background: &ImageSurface, ink: &ImageSurface) {
    let _ = ctx.save();
    for layer in [background, ink] {
        if ctx.set_source_surface(layer, 0.0, 0.0).is_ok() {
            let _ = ctx.paint(); // Ignore errors - a failed layer just stays blank
        }
    }
    let _ = ctx.restore();
}

/// Renders the placeholder shown before the background loads (or after it failed).
///
/// Draws a flat light fill with a thin border so the board area stays visible
/// without suggesting that drawing is possible.
pub fn render_empty_state(ctx: &Context, width: f64, height: f64) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    let _ = ctx.save();
    EMPTY_STATE_FILL.apply(ctx);
    ctx.rectangle(0.0, 0.0, width, height);
    let _ = ctx.fill();

    ctx.set_source_rgba(0.8, 0.8, 0.8, 1.0);
    ctx.set_line_width(1.0);
    ctx.rectangle(0.5, 0.5, width - 1.0, height - 1.0);
    let _ = ctx.stroke();
    let _ = ctx.restore();
}

/// Renders the eraser cursor: a translucent disc the size of the eraser.
pub fn render_eraser_preview(ctx: &Context, center_x: f64, center_y: f64, diameter: f64) {
    let radius = (diameter / 2.0).max(0.5);
    let _ = ctx.save();

    ERASER_PREVIEW_FILL.apply(ctx);
    ctx.arc(center_x, center_y, radius, 0.0, std::f64::consts::PI * 2.0);
    let _ = ctx.fill();

    // Keep the 1px outline inside the disc like a border-box circle.
    ERASER_PREVIEW_OUTLINE.apply(ctx);
    ctx.set_line_width(1.0);
    ctx.arc(
        center_x,
        center_y,
        (radius - 0.5).max(0.5),
        0.0,
        std::f64::consts::PI * 2.0,
    );
    let _ = ctx.stroke();

    let _ = ctx.restore();
}
