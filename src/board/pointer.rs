use super::core::Board;
use super::types::{BoardError, BoardPhase};
use crate::input::{DeviceEvent, InkMode, Point, StrokeEvent, SurfaceBounds, TrackedInput};

impl Board {
    /// Processes one raw mouse or touch event.
    ///
    /// # Arguments
    /// * `event` - Device event in client coordinates
    /// * `bounds` - On-screen origin of the ink surface
    ///
    /// # Behavior
    /// - While `Unloaded`: the event is ignored entirely
    /// - Otherwise the event is normalized by the input tracker and the
    ///   resulting stroke event is painted immediately
    ///
    /// The returned [`TrackedInput`] tells the host whether to suppress its
    /// default touch gestures.
    pub fn handle_input(
        &mut self,
        event: DeviceEvent,
        bounds: SurfaceBounds,
    ) -> Result<TrackedInput, BoardError> {
        if self.phase == BoardPhase::Unloaded {
            return Ok(TrackedInput::ignored());
        }

        let cursor_before = self.tracker.cursor();
        let tracked = self.tracker.track(&event, bounds);

        if self.style.mode() == InkMode::Erase && self.tracker.cursor() != cursor_before {
            self.needs_redraw = true;
        }

        match tracked.stroke {
            Some(StrokeEvent::Start(point)) => self.stroke_start(point),
            Some(StrokeEvent::Move(point)) => {
                self.stroke_move(point)?;
            }
            Some(StrokeEvent::End) => self.stroke_end(),
            None => {}
        }

        Ok(tracked)
    }

    /// Starts a stroke at `point`. Nothing is painted until the first move.
    pub fn stroke_start(&mut self, point: Point) {
        if self.phase == BoardPhase::Unloaded {
            return;
        }
        self.renderer.begin(point);
        self.phase = BoardPhase::Drawing;
    }

    /// Extends the current stroke to `point`.
    ///
    /// Returns `true` if a segment was painted onto the ink surface.
    pub fn stroke_move(&mut self, point: Point) -> Result<bool, BoardError> {
        if self.phase != BoardPhase::Drawing {
            return Ok(false);
        }

        let style = self.style.state();
        let renderer = &mut self.renderer;
        let painted = self
            .surfaces
            .with_ink(|ctx| renderer.extend(ctx, point, &style))?
            .unwrap_or(false);

        if painted {
            self.needs_redraw = true;
        }
        Ok(painted)
    }

    /// Ends the current stroke.
    pub fn stroke_end(&mut self) {
        self.renderer.end();
        if self.phase == BoardPhase::Drawing {
            self.phase = BoardPhase::Ready;
        }
    }
}
