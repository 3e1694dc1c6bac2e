//! Background image loading.

use super::types::BoardError;
use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

/// Abstraction over how background image bytes are fetched.
#[async_trait]
pub trait BackgroundLoader: Send + Sync {
    /// Fetches the encoded (PNG) image referenced by `reference`.
    async fn load(&self, reference: &str) -> Result<Vec<u8>, BoardError>;
}

/// Loads backgrounds from the local filesystem.
///
/// Accepts plain paths and `file://` URLs. Relative paths are resolved
/// against the asset directory.
#[derive(Debug, Clone)]
pub struct FileBackgroundLoader {
    asset_dir: PathBuf,
}

impl FileBackgroundLoader {
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
        }
    }

    /// Maps an image reference onto a filesystem path.
    pub fn resolve(&self, reference: &str) -> Result<PathBuf, BoardError> {
        // Single-letter schemes are Windows drive letters, not URLs.
        if let Ok(url) = Url::parse(reference)
            && url.scheme().len() > 1
        {
            if url.scheme() != "file" {
                return Err(BoardError::ImageLoad(format!(
                    "unsupported image source scheme '{}'",
                    url.scheme()
                )));
            }
            return url
                .to_file_path()
                .map_err(|_| BoardError::ImageLoad(format!("invalid file URL '{reference}'")));
        }

        let path = crate::util::expand_tilde(reference);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(self.asset_dir.join(path))
        }
    }
}

#[async_trait]
impl BackgroundLoader for FileBackgroundLoader {
    async fn load(&self, reference: &str) -> Result<Vec<u8>, BoardError> {
        let path = self.resolve(reference)?;
        log::debug!("Reading background from {}", path.display());
        tokio::fs::read(&path)
            .await
            .map_err(|e| BoardError::ImageLoad(format!("{}: {}", path.display(), e)))
    }
}
