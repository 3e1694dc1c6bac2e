//! Layered annotation board: a background image under a freehand ink layer.
//!
//! The [`Board`] is the widget. It owns its Cairo surfaces, normalizes pointer
//! and touch input into strokes, applies toolbar commands, and exports the
//! flattened result as PNG. The [`publish`] module uploads exports and links
//! them to participants; [`config`] carries the user settings and board
//! profiles shared by the binary and any embedding host.

pub mod board;
pub mod config;
pub mod draw;
pub mod input;
pub mod publish;
pub mod script;
pub mod util;

pub use board::Board;
pub use config::Config;
