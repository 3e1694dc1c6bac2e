//! Drawing mode and stroke style controller.

use crate::draw::{BLACK, Color};
use serde::{Deserialize, Serialize};

/// Smallest eraser diameter the toolbar slider allows.
pub const MIN_ERASER_DIAMETER: f64 = 5.0;
/// Largest eraser diameter the toolbar slider allows.
pub const MAX_ERASER_DIAMETER: f64 = 50.0;
/// Eraser diameter used before the user touches the slider.
pub const DEFAULT_ERASER_DIAMETER: f64 = 20.0;
/// Width of ink strokes in pixels.
pub const DEFAULT_PEN_WIDTH: f64 = 2.0;

/// Whether strokes add ink or remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkMode {
    /// Paint with the line color (source-over)
    #[default]
    Draw,
    /// Remove previously drawn ink (destination-out)
    Erase,
}

/// Style snapshot read by the stroke renderer for every segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleState {
    pub mode: InkMode,
    pub line_color: Color,
    pub eraser_diameter: f64,
    pub pen_width: f64,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            mode: InkMode::Draw,
            line_color: BLACK,
            eraser_diameter: DEFAULT_ERASER_DIAMETER,
            pen_width: DEFAULT_PEN_WIDTH,
        }
    }
}

impl StyleState {
    /// Width of the segment painted in the current mode.
    pub fn stroke_width(&self) -> f64 {
        match self.mode {
            InkMode::Draw => self.pen_width,
            InkMode::Erase => self.eraser_diameter,
        }
    }
}

/// Owns the style state behind the toolbar (draw/erase toggle, color picker,
/// eraser slider). Setters take effect on the next painted segment.
#[derive(Debug, Default)]
pub struct StyleController {
    state: StyleState,
}

impl StyleController {
    pub fn new(initial: StyleState) -> Self {
        let mut controller = Self { state: initial };
        // Route through the setter so configured values obey the same bounds.
        controller.set_eraser_diameter(initial.eraser_diameter);
        controller
    }

    /// Copy of the current style.
    pub fn state(&self) -> StyleState {
        self.state
    }

    pub fn mode(&self) -> InkMode {
        self.state.mode
    }

    pub fn set_mode(&mut self, mode: InkMode) {
        if self.state.mode != mode {
            log::debug!("Ink mode: {:?} -> {:?}", self.state.mode, mode);
        }
        self.state.mode = mode;
    }

    pub fn set_line_color(&mut self, color: Color) {
        log::debug!(
            "Line color set to {} ({})",
            color.to_hex(),
            crate::util::color_to_name(&color)
        );
        self.state.line_color = color;
    }

    /// Sets the eraser diameter, clamped to the slider range.
    ///
    /// Returns the value actually applied.
    pub fn set_eraser_diameter(&mut self, diameter: f64) -> f64 {
        let clamped = if diameter.is_nan() {
            DEFAULT_ERASER_DIAMETER
        } else {
            diameter.clamp(MIN_ERASER_DIAMETER, MAX_ERASER_DIAMETER)
        };
        self.state.eraser_diameter = clamped;
        clamped
    }
}
