//! Data types for the annotation board.

use thiserror::Error;

/// Lifecycle phase of a board.
///
/// `Unloaded -> Ready` once the background image is decoded, then
/// `Ready <-> Drawing` for each stroke. A loaded board never returns to
/// `Unloaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// Background not loaded yet (or failed to load); drawing disabled.
    Unloaded,
    /// Surfaces exist and no stroke is in progress.
    Ready,
    /// A stroke is being drawn.
    Drawing,
}

/// Errors produced by board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Background image could not be loaded: {0}")]
    ImageLoad(String),

    #[error("Board is not ready: the background image has not been loaded")]
    ExportNotReady,

    #[error("A stroke is in progress")]
    StrokeInProgress,

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Surface operation failed: {0}")]
    Surface(#[from] cairo::Error),
}
