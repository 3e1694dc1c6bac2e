//! Saving exported boards.
//!
//! A finished board is encoded to PNG, uploaded to an image store, and linked
//! to a participant through a record insert. Both collaborators sit behind
//! traits; the defaults write to a local directory and a JSON-lines file.

pub mod dependencies;
pub mod records;
pub mod storage;
pub mod types;

mod manager;
mod pipeline;

pub use dependencies::{ImageStore, PublishDependencies, RecordSink};
pub use manager::PublishManager;
pub use pipeline::PNG_CONTENT_TYPE;
pub use records::{JsonlRecordSink, RecordRow};
pub use storage::{LocalImageStore, generate_filename};
pub use types::{
    PublishError, PublishOutcome, PublishResult, PublishStatus, PublishTarget, SUCCESS_MESSAGE,
};
