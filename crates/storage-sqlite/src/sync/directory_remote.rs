//! A sync target that keeps one JSON document per category in a directory,
//! typically a folder shared by a file-sync client or a mounted drive.

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use marginwatch_core::sync::{RemoteSyncTrait, SyncCategory, SyncError};

pub struct DirectoryRemote {
    root: PathBuf,
}

impl DirectoryRemote {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, category: SyncCategory) -> PathBuf {
        self.root.join(format!("{}.json", category.as_str()))
    }
}

#[async_trait]
impl RemoteSyncTrait for DirectoryRemote {
    async fn push(&self, category: SyncCategory, payload: Value) -> Result<(), SyncError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| SyncError::Unreachable(format!("{}: {}", self.root.display(), e)))?;

        let body = serde_json::to_vec_pretty(&payload)
            .map_err(|e| SyncError::Rejected(e.to_string()))?;

        // Write next to the target and rename so readers never see a partial file
        let target = self.document_path(category);
        let staging = target.with_extension("json.tmp");
        tokio::fs::write(&staging, body)
            .await
            .map_err(|e| SyncError::Unreachable(format!("{}: {}", staging.display(), e)))?;
        tokio::fs::rename(&staging, &target)
            .await
            .map_err(|e| SyncError::Unreachable(format!("{}: {}", target.display(), e)))?;

        log::debug!("Pushed {} to {}", category, target.display());
        Ok(())
    }

    async fn pull(&self, category: SyncCategory) -> Result<Option<Value>, SyncError> {
        let path = self.document_path(category);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SyncError::Unreachable(format!("{}: {}", path.display(), e)));
            }
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| SyncError::Malformed(format!("{}: {}", path.display(), e)))
    }
}
