use std::{fmt, sync::Arc};

use tokio::sync::{Mutex, oneshot};

use crate::publish::{
    dependencies::PublishDependencies,
    storage::generate_filename,
    types::{PublishError, PublishOutcome, PublishResult, PublishStatus, PublishTarget},
};

/// MIME type sent with every upload.
pub const PNG_CONTENT_TYPE: &str = "image/png";

pub(crate) struct PublishRequest {
    pub(crate) png: Vec<u8>,
    pub(crate) target: PublishTarget,
    pub(crate) reply: Option<oneshot::Sender<PublishOutcome>>,
}

impl fmt::Debug for PublishRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishRequest")
            .field("png_bytes", &self.png.len())
            .field("target", &self.target)
            .field("reply", &self.reply.is_some())
            .finish()
    }
}

pub(crate) async fn perform_publish(
    png: Vec<u8>,
    target: &PublishTarget,
    dependencies: Arc<PublishDependencies>,
    status: &Mutex<PublishStatus>,
) -> Result<PublishResult, PublishError> {
    let filename = generate_filename(&target.bucket, chrono::Utc::now().timestamp_millis());
    log::info!(
        "Publishing {} ({} bytes) for '{}'",
        filename,
        png.len(),
        target.subject_id
    );

    // Step 1: upload the PNG
    *status.lock().await = PublishStatus::Uploading;
    let image_url = upload_image(&dependencies, &target.bucket, &filename, &png).await?;

    // Step 2: link it to the participant
    *status.lock().await = PublishStatus::Persisting;
    persist_record(&dependencies, target, &image_url).await?;

    Ok(PublishResult {
        filename,
        image_url,
        byte_len: png.len(),
    })
}

/// Uploads `png` and resolves its public URL.
pub(crate) async fn upload_image(
    dependencies: &PublishDependencies,
    bucket: &str,
    filename: &str,
    png: &[u8],
) -> Result<String, PublishError> {
    dependencies
        .store
        .upload(bucket, filename, PNG_CONTENT_TYPE, png)
        .await
        .map_err(PublishError::Upload)?;

    let url = dependencies
        .store
        .public_url(bucket, filename)
        .ok_or(PublishError::MissingPublicUrl)?;
    log::debug!("Public URL for {}: {}", filename, url);
    Ok(url)
}

pub(crate) async fn persist_record(
    dependencies: &PublishDependencies,
    target: &PublishTarget,
    image_url: &str,
) -> Result<(), PublishError> {
    dependencies
        .records
        .insert(&target.table, &target.subject_id, image_url)
        .await
        .map_err(PublishError::Persist)
}
