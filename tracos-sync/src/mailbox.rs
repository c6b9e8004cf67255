//! Customer ERP Mailbox
//!
//! The customer ERP is reached only through two directories of JSON files.
//! The `try_*` methods report the precise cause of a failure; the plain
//! methods collapse every failure to "no work" (`Vec::new()`, `None`,
//! `false`) after logging it, which is all the orchestrator needs.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use tracos_sync_api::{MailboxError, MailboxErrorKind};
use tracos_sync_db::models::customer::CustomerWorkorderModel;
use tracos_sync_db::models::natural_key::NaturalKey;

#[async_trait]
pub trait CustomerMailbox: Send + Sync {
    /// `*.json` regular files directly under `dir`, sorted by path.
    async fn try_list(&self, dir: &Path) -> Result<Vec<PathBuf>, MailboxError>;

    /// Parses one file as a JSON document.
    async fn try_read(&self, path: &Path) -> Result<Value, MailboxError>;

    /// Writes `record` to `<dir>/<orderNo>.json`, replacing any existing file.
    ///
    /// # Returns
    /// The path that was written.
    async fn try_write(
        &self,
        dir: &Path,
        record: &CustomerWorkorderModel,
    ) -> Result<PathBuf, MailboxError>;

    async fn list_candidates(&self, dir: &Path) -> Vec<PathBuf> {
        match self.try_list(dir).await {
            Ok(paths) => paths,
            Err(err) => {
                warn!(dir = %dir.display(), kind = %err.kind, error = %err, "Cannot list mailbox directory, treating as empty");
                Vec::new()
            }
        }
    }

    async fn read(&self, path: &Path) -> Option<Value> {
        match self.try_read(path).await {
            Ok(document) => Some(document),
            Err(err) => {
                warn!(path = %path.display(), kind = %err.kind, error = %err, "Cannot read mailbox file, skipping");
                None
            }
        }
    }

    async fn write(&self, dir: &Path, record: &CustomerWorkorderModel) -> bool {
        match self.try_write(dir, record).await {
            Ok(path) => {
                info!(order_no = record.order_no, path = %path.display(), "Workorder written to mailbox");
                true
            }
            Err(err) => {
                warn!(order_no = record.order_no, dir = %dir.display(), kind = %err.kind, error = %err, "Cannot write workorder to mailbox");
                false
            }
        }
    }
}

/// Mailbox backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMailbox;

impl FsMailbox {
    pub fn new() -> Self {
        Self
    }

    pub fn file_name(order_no: i64) -> String {
        format!("{order_no}.json")
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("json")
}

#[async_trait]
impl CustomerMailbox for FsMailbox {
    async fn try_list(&self, dir: &Path) -> Result<Vec<PathBuf>, MailboxError> {
        let metadata = fs::metadata(dir)
            .await
            .map_err(|e| MailboxError::from_io(dir, &e))?;
        if !metadata.is_dir() {
            return Err(MailboxError::new(
                dir,
                MailboxErrorKind::NotADirectory,
                "path exists but is not a directory",
            ));
        }

        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| MailboxError::from_io(dir, &e))?;
        let mut candidates = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| MailboxError::from_io(dir, &e))?
        {
            let path = entry.path();
            if !has_json_extension(&path) {
                continue;
            }
            // Follows symlinks, so a link to a regular file counts.
            match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => candidates.push(path),
                _ => {}
            }
        }

        candidates.sort();
        info!(dir = %dir.display(), count = candidates.len(), "Listed mailbox candidates");
        Ok(candidates)
    }

    async fn try_read(&self, path: &Path) -> Result<Value, MailboxError> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| MailboxError::from_io(path, &e))?;
        serde_json::from_str(&raw)
            .map_err(|e| MailboxError::new(path, MailboxErrorKind::Malformed, e.to_string()))
    }

    async fn try_write(
        &self,
        dir: &Path,
        record: &CustomerWorkorderModel,
    ) -> Result<PathBuf, MailboxError> {
        let path = dir.join(Self::file_name(record.natural_key()));
        let body = serde_json::to_vec_pretty(record)
            .map_err(|e| MailboxError::new(&path, MailboxErrorKind::Malformed, e.to_string()))?;
        fs::write(&path, body)
            .await
            .map_err(|e| MailboxError::from_io(&path, &e))?;
        Ok(path)
    }
}
