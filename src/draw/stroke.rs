//! Incremental freehand stroke rendering onto the ink surface.

use crate::input::{InkMode, Point, StyleState};
use cairo::{Context, LineCap, LineJoin, Operator};

/// Paints each stroke segment as soon as its end point arrives.
///
/// Segments are not retained: there is no replay or undo log. The renderer
/// only remembers the last point of the current stroke so consecutive moves
/// connect into a continuous line.
#[derive(Debug, Default)]
pub struct StrokeRenderer {
    last_point: Option<Point>,
}

impl StrokeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending start of the next segment, if a stroke is in progress.
    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    /// Begins a new stroke. A single point paints nothing.
    pub fn begin(&mut self, point: Point) {
        self.last_point = Some(point);
    }

    /// Extends the stroke to `point`, painting one segment from the last point.
    ///
    /// Returns `true` if a segment was painted.
    pub fn extend(
        &mut self,
        ctx: &Context,
        point: Point,
        style: &StyleState,
    ) -> Result<bool, cairo::Error> {
        let Some(from) = self.last_point else {
            return Ok(false);
        };
        render_segment(ctx, from, point, style)?;
        self.last_point = Some(point);
        Ok(true)
    }

    /// Ends the stroke; the next [`begin`](Self::begin) starts an unconnected line.
    pub fn end(&mut self) {
        self.last_point = None;
    }
}

/// Paints a single round-capped, round-joined segment.
///
/// Erase mode uses destination-out compositing so the segment removes alpha
/// from the ink layer instead of painting color over it.
pub fn render_segment(
    ctx: &Context,
    from: Point,
    to: Point,
    style: &StyleState,
) -> Result<(), cairo::Error> {
    ctx.save()?;

    ctx.set_line_join(LineJoin::Round);
    ctx.set_line_cap(LineCap::Round);
    ctx.set_line_width(style.stroke_width());

    match style.mode {
        InkMode::Draw => {
            ctx.set_operator(Operator::Over);
            style.line_color.apply(ctx);
        }
        InkMode::Erase => {
            ctx.set_operator(Operator::DestOut);
            ctx.set_source_rgba(0.0, 0.0, 0.0, 1.0);
        }
    }

    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    let stroked = ctx.stroke();

    ctx.restore()?;
    stroked
}
