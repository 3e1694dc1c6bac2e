//! Pointer and touch normalization into a single stroke stream.

use super::events::{DeviceEvent, MouseButton, Point, StrokeEvent, SurfaceBounds};

/// Result of feeding one device event through the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedInput {
    /// Stroke event to render, if the device event produced one.
    pub stroke: Option<StrokeEvent>,
    /// The host should suppress its default gesture handling (scroll, zoom).
    pub prevent_default: bool,
}

impl TrackedInput {
    pub fn ignored() -> Self {
        Self {
            stroke: None,
            prevent_default: false,
        }
    }

    fn stroke(event: StrokeEvent, prevent_default: bool) -> Self {
        Self {
            stroke: Some(event),
            prevent_default,
        }
    }
}

/// Tracks the gesture lifecycle for a single board.
///
/// Only one gesture can be active at a time. Touch starts carrying more than
/// one contact are ignored so that multi-finger gestures never draw.
#[derive(Debug, Default)]
pub struct InputTracker {
    active: bool,
    cursor: Option<Point>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a gesture is currently in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last known cursor position in surface space, if the pointer is over the board.
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Drops the current gesture without emitting an event.
    ///
    /// Returns `true` if a gesture was active.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    /// Converts a device event into a stroke event relative to `bounds`.
    pub fn track(&mut self, event: &DeviceEvent, bounds: SurfaceBounds) -> TrackedInput {
        match event {
            DeviceEvent::MouseDown { button, x, y } => {
                if *button != MouseButton::Left {
                    return TrackedInput::ignored();
                }
                let point = bounds.to_surface(*x, *y);
                self.active = true;
                self.cursor = Some(point);
                TrackedInput::stroke(StrokeEvent::Start(point), false)
            }
            DeviceEvent::MouseMove { x, y } => {
                let point = bounds.to_surface(*x, *y);
                self.cursor = Some(point);
                if self.active {
                    TrackedInput::stroke(StrokeEvent::Move(point), false)
                } else {
                    TrackedInput::ignored()
                }
            }
            DeviceEvent::MouseUp { button } => {
                if *button != MouseButton::Left {
                    return TrackedInput::ignored();
                }
                self.finish(false)
            }
            DeviceEvent::MouseLeave => {
                self.cursor = None;
                self.finish(false)
            }
            DeviceEvent::TouchStart { touches } => {
                let [first] = touches.as_slice() else {
                    log::debug!("Ignoring touch start with {} contacts", touches.len());
                    return TrackedInput::ignored();
                };
                let point = bounds.to_surface(first.x, first.y);
                self.active = true;
                self.cursor = Some(point);
                TrackedInput::stroke(StrokeEvent::Start(point), true)
            }
            DeviceEvent::TouchMove { touches } => {
                if !self.active {
                    return TrackedInput::ignored();
                }
                let Some(first) = touches.first() else {
                    return TrackedInput {
                        stroke: None,
                        prevent_default: true,
                    };
                };
                let point = bounds.to_surface(first.x, first.y);
                self.cursor = Some(point);
                TrackedInput::stroke(StrokeEvent::Move(point), true)
            }
            DeviceEvent::TouchEnd | DeviceEvent::TouchCancel => self.finish(true),
        }
    }

    fn finish(&mut self, touch: bool) -> TrackedInput {
        if self.cancel() {
            TrackedInput::stroke(StrokeEvent::End, touch)
        } else {
            TrackedInput::ignored()
        }
    }
}
