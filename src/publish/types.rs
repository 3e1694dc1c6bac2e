//! Data types for saving exported boards.

use crate::board::BoardError;
use thiserror::Error;

/// Message reported when both the upload and the record insert succeed.
pub const SUCCESS_MESSAGE: &str = "Upload and save succeeded";

/// Where an exported board image goes and who it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    /// Storage bucket for the PNG.
    pub bucket: String,
    /// Record table that links the image to the subject.
    pub table: String,
    /// Participant the drawing belongs to.
    pub subject_id: String,
}

impl PublishTarget {
    pub fn new(bucket: &str, table: &str, subject_id: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            table: table.to_string(),
            subject_id: subject_id.to_string(),
        }
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    /// Object name inside the bucket (`<bucket>-<unix millis>.png`).
    pub filename: String,
    /// Public URL stored in the record.
    pub image_url: String,
    /// Size of the uploaded PNG.
    pub byte_len: usize,
}

/// Outcome of a publish request (success or failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Success(PublishResult),
    Failed(String),
}

impl PublishOutcome {
    /// User-facing message for the outcome.
    pub fn message(&self) -> &str {
        match self {
            PublishOutcome::Success(_) => SUCCESS_MESSAGE,
            PublishOutcome::Failed(message) => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PublishOutcome::Success(_))
    }
}

/// Errors that can occur while saving a board.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Export failed: {0}")]
    Export(#[from] BoardError),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Failed to create public URL")]
    MissingPublicUrl,

    #[error("Saving record failed: {0}")]
    Persist(String),

    #[error("Publish manager not running")]
    ManagerStopped,

    #[error("Publish task failed: {0}")]
    Task(String),
}

/// Status of the publish worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    /// Nothing in flight.
    Idle,
    /// Sending the PNG to the image store.
    Uploading,
    /// Inserting the record that references the uploaded image.
    Persisting,
    /// Last request completed successfully.
    Success,
    /// Last request failed.
    Failed(String),
}
