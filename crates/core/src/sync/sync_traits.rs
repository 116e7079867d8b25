use async_trait::async_trait;
use serde_json::Value;

use super::sync_model::{SyncCategory, SyncError, SyncReport};
use crate::errors::Result;

/// A remote store of user data, one JSON document per category.
/// Last write wins; there is no conflict resolution.
#[async_trait]
pub trait RemoteSyncTrait: Send + Sync {
    async fn push(&self, category: SyncCategory, payload: Value) -> std::result::Result<(), SyncError>;

    /// `Ok(None)` when nothing has been pushed for `category` yet.
    async fn pull(&self, category: SyncCategory) -> std::result::Result<Option<Value>, SyncError>;
}

#[async_trait]
pub trait SyncServiceTrait: Send + Sync {
    async fn push_all(&self) -> Result<SyncReport>;
    async fn pull_all(&self) -> Result<SyncReport>;
}
