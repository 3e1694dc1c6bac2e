//! Generic input event types for cross-backend compatibility.

use serde::{Deserialize, Serialize};

/// A position in ink-surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen origin of the ink surface's bounding box.
///
/// Device coordinates are converted into surface space by subtracting this origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
}

impl SurfaceBounds {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Converts a device coordinate into a surface-relative point.
    pub fn to_surface(&self, x: f64, y: f64) -> Point {
        Point {
            x: x - self.left,
            y: y - self.top,
        }
    }
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// Left mouse button (primary drawing button)
    Left,
    /// Right mouse button (context menu, never draws)
    Right,
    /// Middle mouse button (currently unused)
    Middle,
}

/// Raw pointer or touch event in device (client) coordinates.
///
/// Backends map their native events to these variants; the
/// [`InputTracker`](super::InputTracker) turns them into stroke events.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    MouseDown { button: MouseButton, x: f64, y: f64 },
    MouseMove { x: f64, y: f64 },
    MouseUp { button: MouseButton },
    MouseLeave,
    /// Touch contacts currently on the surface, first contact first.
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    TouchEnd,
    TouchCancel,
}

impl DeviceEvent {
    /// Whether the event originated from a touch screen.
    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            DeviceEvent::TouchStart { .. }
                | DeviceEvent::TouchMove { .. }
                | DeviceEvent::TouchEnd
                | DeviceEvent::TouchCancel
        )
    }
}

/// Logical stroke lifecycle events consumed by the stroke renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeEvent {
    Start(Point),
    Move(Point),
    End,
}
