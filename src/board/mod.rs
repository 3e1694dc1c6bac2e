//! The annotation board widget.
//!
//! A [`Board`] layers a freehand ink surface over a background image. It
//! owns the surfaces, turns pointer and touch input into painted segments,
//! applies toolbar commands, and exports the flattened result as PNG.

pub mod background;
pub mod types;

mod actions;
mod core;
mod pointer;
#[cfg(test)]
mod tests;

pub use background::{BackgroundLoader, FileBackgroundLoader};
pub use core::{Board, BoardSettings};
pub use types::{BoardError, BoardPhase};
