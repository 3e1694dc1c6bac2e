//! JSON-lines record sink.

use super::dependencies::RecordSink;
use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::task;

/// One saved drawing as written to the records file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    pub table: String,
    pub participant_id: String,
    pub image_url: String,
    /// RFC 3339 insertion time.
    pub created_at: String,
}

/// Appends one JSON object per insert to a local file.
///
/// Writers take an exclusive lock on the file so concurrent processes never
/// interleave partial lines.
#[derive(Debug, Clone)]
pub struct JsonlRecordSink {
    path: PathBuf,
}

impl JsonlRecordSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, row: &RecordRow) -> Result<(), String> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let mut line = serde_json::to_string(row).map_err(|e| e.to_string())?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| format!("{}: {}", self.path.display(), e))?;
        file.lock_exclusive()
            .map_err(|e| format!("failed to lock {}: {}", self.path.display(), e))?;

        let written = file.write_all(line.as_bytes()).and_then(|_| file.flush());

        file.unlock().unwrap_or_else(|err| {
            log::warn!("failed to unlock records file {}: {}", self.path.display(), err)
        });

        written.map_err(|e| format!("{}: {}", self.path.display(), e))
    }

    /// Reads every row back, skipping lines that fail to parse.
    pub fn read_all(&self) -> Result<Vec<RecordRow>, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.to_string()),
        };

        Ok(contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(row) => Some(row),
                Err(err) => {
                    log::warn!("Skipping malformed record line: {}", err);
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl RecordSink for JsonlRecordSink {
    async fn insert(&self, table: &str, subject_id: &str, image_url: &str) -> Result<(), String> {
        let row = RecordRow {
            table: table.to_string(),
            participant_id: subject_id.to_string(),
            image_url: image_url.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let sink = self.clone();
        task::spawn_blocking(move || sink.append(&row))
            .await
            .map_err(|e| format!("Record task failed: {}", e))??;

        log::info!("Recorded drawing for '{}' in '{}'", subject_id, table);
        Ok(())
    }
}
