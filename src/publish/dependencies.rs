use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StorageConfig;
use crate::publish::{records::JsonlRecordSink, storage::LocalImageStore};

/// Object storage that receives exported PNGs.
///
/// Errors are plain messages; the pipeline surfaces them verbatim.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), String>;

    /// Publicly reachable URL of an uploaded object, if the store can produce one.
    fn public_url(&self, bucket: &str, filename: &str) -> Option<String>;
}

/// Table storage that links an uploaded image to a participant.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn insert(&self, table: &str, subject_id: &str, image_url: &str) -> Result<(), String>;
}

/// Bundle of collaborators used by the publish pipeline. Each one can be mocked in tests.
#[derive(Clone)]
pub struct PublishDependencies {
    pub store: Arc<dyn ImageStore>,
    pub records: Arc<dyn RecordSink>,
}

impl PublishDependencies {
    /// Local-directory store plus JSON-lines record file from the storage config.
    pub fn local(config: &StorageConfig) -> Self {
        Self {
            store: Arc::new(LocalImageStore::new(crate::util::expand_tilde(
                &config.directory,
            ))),
            records: Arc::new(JsonlRecordSink::new(crate::util::expand_tilde(
                &config.records_file,
            ))),
        }
    }
}

impl Default for PublishDependencies {
    fn default() -> Self {
        Self::local(&StorageConfig::default())
    }
}
