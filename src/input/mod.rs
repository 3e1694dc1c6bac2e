//! Input handling and style state.
//!
//! This module translates backend mouse and touch events into stroke events
//! relative to the ink surface, and owns the draw/erase mode and stroke style
//! that the toolbar manipulates.

pub mod events;
pub mod style;
pub mod tracker;

// Re-export commonly used types at module level
pub use events::{DeviceEvent, MouseButton, Point, StrokeEvent, SurfaceBounds};
pub use style::{InkMode, StyleController, StyleState};
pub use tracker::{InputTracker, TrackedInput};
