//! Replayable input scripts for driving a board without a display.
//!
//! A script is a JSON document listing toolbar commands and device events in
//! order. Coordinates are client coordinates; `origin` is the on-screen
//! position of the ink surface.
//!
//! ```json
//! {
//!   "origin": [0, 0],
//!   "steps": [
//!     { "op": "color", "value": "red" },
//!     { "op": "press", "x": 100, "y": 100 },
//!     { "op": "move", "x": 200, "y": 100 },
//!     { "op": "release" },
//!     { "op": "mode", "value": "erase" },
//!     { "op": "eraser_size", "value": 20 }
//!   ]
//! }
//! ```

use crate::board::Board;
use crate::config::ColorSpec;
use crate::input::{DeviceEvent, InkMode, MouseButton, Point, SurfaceBounds};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_button() -> MouseButton {
    MouseButton::Left
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Resize {
        width: u32,
    },
    Mode {
        value: InkMode,
    },
    Color {
        value: ColorSpec,
    },
    EraserSize {
        value: f64,
    },
    Press {
        x: f64,
        y: f64,
        #[serde(default = "default_button")]
        button: MouseButton,
    },
    Move {
        x: f64,
        y: f64,
    },
    Release {
        #[serde(default = "default_button")]
        button: MouseButton,
    },
    Leave,
    TouchStart {
        touches: Vec<Point>,
    },
    TouchMove {
        touches: Vec<Point>,
    },
    TouchEnd,
    TouchCancel,
    Clear,
}

/// Ordered list of steps plus the surface origin used for every event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub origin: [f64; 2],
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    /// Reads and parses a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn bounds(&self) -> SurfaceBounds {
        SurfaceBounds::new(self.origin[0], self.origin[1])
    }

    /// Replays every step onto `board`.
    ///
    /// Stops at the first step the board rejects and reports its index.
    pub fn apply(&self, board: &mut Board) -> Result<()> {
        let bounds = self.bounds();
        for (index, step) in self.steps.iter().enumerate() {
            apply_step(board, step, bounds)
                .with_context(|| format!("Script step {} ({:?}) failed", index, step))?;
        }
        log::info!("Replayed {} script steps", self.steps.len());
        Ok(())
    }
}

fn apply_step(board: &mut Board, step: &ScriptStep, bounds: SurfaceBounds) -> Result<()> {
    let event = match step {
        ScriptStep::Resize { width } => {
            board.resize(*width)?;
            return Ok(());
        }
        ScriptStep::Mode { value } => {
            board.set_mode(*value);
            return Ok(());
        }
        ScriptStep::Color { value } => {
            board.set_line_color(value.to_color());
            return Ok(());
        }
        ScriptStep::EraserSize { value } => {
            let applied = board.set_eraser_diameter(*value);
            if applied != *value {
                log::warn!("Eraser size {} clamped to {}", value, applied);
            }
            return Ok(());
        }
        ScriptStep::Clear => {
            board.clear()?;
            return Ok(());
        }
        ScriptStep::Press { x, y, button } => DeviceEvent::MouseDown {
            button: *button,
            x: *x,
            y: *y,
        },
        ScriptStep::Move { x, y } => DeviceEvent::MouseMove { x: *x, y: *y },
        ScriptStep::Release { button } => DeviceEvent::MouseUp { button: *button },
        ScriptStep::Leave => DeviceEvent::MouseLeave,
        ScriptStep::TouchStart { touches } => DeviceEvent::TouchStart {
            touches: touches.clone(),
        },
        ScriptStep::TouchMove { touches } => DeviceEvent::TouchMove {
            touches: touches.clone(),
        },
        ScriptStep::TouchEnd => DeviceEvent::TouchEnd,
        ScriptStep::TouchCancel => DeviceEvent::TouchCancel,
    };

    board.handle_input(event, bounds)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardPhase, BoardSettings};
    use crate::config::BoardProfile;
    use crate::draw::{Layer, pixel_alpha, pixel_rgb};
    use cairo::{Context as CairoContext, Format, ImageSurface};

    fn loaded_board() -> Board {
        let surface = ImageSurface::create(Format::ARgb32, 200, 100).unwrap();
        let ctx = CairoContext::new(&surface).unwrap();
        ctx.set_source_rgb(1.0, 1.0, 1.0);
        ctx.paint().unwrap();
        drop(ctx);
        let mut png = Vec::new();
        surface.write_to_png(&mut png).unwrap();

        let mut board = Board::new(
            BoardProfile::new("bg.png", "lifegraph", "lifegraph"),
            BoardSettings {
                container_width: 200,
                ..BoardSettings::default()
            },
        );
        board.install_background(&png).unwrap();
        board
    }

    #[test]
    fn parses_all_step_kinds() {
        let script = Script::from_json(
            r##"{
                "origin": [10, 20],
                "steps": [
                    {"op": "resize", "width": 300},
                    {"op": "mode", "value": "erase"},
                    {"op": "color", "value": "#00ff00"},
                    {"op": "color", "value": [1, 2, 3]},
                    {"op": "eraser_size", "value": 12.5},
                    {"op": "press", "x": 1, "y": 2},
                    {"op": "press", "x": 1, "y": 2, "button": "right"},
                    {"op": "move", "x": 3, "y": 4},
                    {"op": "release"},
                    {"op": "leave"},
                    {"op": "touch_start", "touches": [{"x": 1, "y": 1}]},
                    {"op": "touch_move", "touches": [{"x": 2, "y": 2}]},
                    {"op": "touch_end"},
                    {"op": "touch_cancel"},
                    {"op": "clear"}
                ]
            }"##,
        )
        .unwrap();

        assert_eq!(script.origin, [10.0, 20.0]);
        assert_eq!(script.steps.len(), 15);
        assert_eq!(
            script.steps[5],
            ScriptStep::Press {
                x: 1.0,
                y: 2.0,
                button: MouseButton::Left
            }
        );
        assert_eq!(
            script.steps[1],
            ScriptStep::Mode {
                value: InkMode::Erase
            }
        );
    }

    #[test]
    fn unknown_op_is_rejected() {
        assert!(Script::from_json(r#"{"steps": [{"op": "undo"}]}"#).is_err());
    }

    #[test]
    fn apply_draws_with_scripted_style() {
        let script = Script::from_json(
            r#"{
                "origin": [5, 5],
                "steps": [
                    {"op": "color", "value": "red"},
                    {"op": "press", "x": 25, "y": 55},
                    {"op": "move", "x": 165, "y": 55},
                    {"op": "release"}
                ]
            }"#,
        )
        .unwrap();

        let mut board = loaded_board();
        script.apply(&mut board).unwrap();

        let argb = board.pixel(Layer::Ink, 100, 50).unwrap();
        assert_eq!(pixel_alpha(argb), 255);
        assert_eq!(pixel_rgb(argb), (255, 0, 0));
        assert_eq!(board.phase(), BoardPhase::Ready);
    }

    #[test]
    fn clear_during_stroke_reports_failing_step() {
        let script = Script::from_json(
            r#"{"steps": [
                {"op": "press", "x": 10, "y": 10},
                {"op": "clear"}
            ]}"#,
        )
        .unwrap();

        let mut board = loaded_board();
        let err = script.apply(&mut board).unwrap_err();
        assert!(format!("{err:#}").contains("Script step 1"));
        assert!(format!("{err:#}").contains("A stroke is in progress"));
    }

    #[test]
    fn load_reads_script_from_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("script.json");
        std::fs::write(&path, r#"{"steps": [{"op": "leave"}]}"#).unwrap();
        let script = Script::load(&path).unwrap();
        assert_eq!(script.steps, vec![ScriptStep::Leave]);
        assert_eq!(script.origin, [0.0, 0.0]);
    }
}
