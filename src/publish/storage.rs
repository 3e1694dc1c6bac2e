//! Local-directory image store.

use super::dependencies::ImageStore;
use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::task;
use url::Url;

/// Builds the object name for an upload: `<bucket>-<unix millis>.png`.
pub fn generate_filename(bucket: &str, unix_millis: i64) -> String {
    format!("{}-{}.png", bucket, unix_millis)
}

/// Stores uploads as `<root>/<bucket>/<filename>` and hands out `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    /// Creates a store rooted at `root`. Relative roots are anchored to the
    /// current directory so public URLs are always absolute.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&root))
                .unwrap_or(root)
        };
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an object is (or would be) stored at.
    pub fn object_path(&self, bucket: &str, filename: &str) -> Result<PathBuf, String> {
        validate_component("bucket", bucket)?;
        validate_component("filename", filename)?;
        Ok(self.root.join(bucket).join(filename))
    }

    fn write_object(&self, bucket: &str, filename: &str, bytes: &[u8]) -> Result<PathBuf, String> {
        let path = self.object_path(bucket, filename)?;
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            log::info!("Creating bucket directory: {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        // Objects are never overwritten; a name collision fails the upload.
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    format!("object {}/{} already exists", bucket, filename)
                }
                _ => format!("{}: {}", path.display(), e),
            })?;
        file.write_all(bytes)
            .map_err(|e| format!("{}: {}", path.display(), e))?;

        // User read/write only
        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, Permissions::from_mode(0o600))
                .map_err(|e| e.to_string())?;
        }

        Ok(path)
    }
}

fn validate_component(kind: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || value.contains('/')
        || value.contains('\\')
    {
        return Err(format!("invalid {} '{}'", kind, value));
    }
    Ok(())
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn upload(
        &self,
        bucket: &str,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), String> {
        log::debug!(
            "Storing {} ({}, {} bytes) in bucket '{}'",
            filename,
            content_type,
            bytes.len(),
            bucket
        );

        let store = self.clone();
        let bucket = bucket.to_string();
        let filename = filename.to_string();
        let bytes = bytes.to_vec();
        let path = task::spawn_blocking(move || store.write_object(&bucket, &filename, &bytes))
            .await
            .map_err(|e| format!("Storage task failed: {}", e))??;

        log::info!("Stored image at {}", path.display());
        Ok(())
    }

    fn public_url(&self, bucket: &str, filename: &str) -> Option<String> {
        let path = self.object_path(bucket, filename).ok()?;
        Url::from_file_path(&path).ok().map(String::from)
    }
}
