use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;

use super::snapshot_model::{Snapshot, SnapshotKey};
use crate::errors::Result;
use crate::risk::AnalysisResult;

/// Persistence contract for the snapshot series.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// The stored series, ascending by key. Corrupt rows are skipped.
    fn load_snapshots(&self) -> Result<Vec<Snapshot>>;

    /// Atomically replaces the stored series with `snapshots`.
    async fn overwrite_snapshots(&self, snapshots: Vec<Snapshot>) -> Result<()>;

    /// Removes one snapshot. Returns the number of rows removed.
    async fn delete_snapshot(&self, key: SnapshotKey) -> Result<usize>;
}

#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Snapshot>>;
    fn latest(&self) -> Result<Option<Snapshot>>;

    /// Whether an automatic capture is due at the current wall clock.
    fn should_capture(&self) -> Result<bool>;

    /// Records a snapshot through retention and returns the retained series.
    async fn record(&self, snapshot: Snapshot) -> Result<Vec<Snapshot>>;

    /// Captures `analysis` if a capture is due. Returns the new snapshot, if any.
    async fn maybe_capture(&self, analysis: &AnalysisResult) -> Result<Option<Snapshot>>;

    /// Captures `analysis` unconditionally.
    async fn force_capture(&self, analysis: &AnalysisResult) -> Result<Snapshot>;

    async fn delete(&self, key: SnapshotKey) -> Result<()>;

    /// Replaces the whole series (import, remote pull). Retention is applied.
    async fn replace_all(&self, snapshots: Vec<Snapshot>) -> Result<Vec<Snapshot>>;

    /// Removes every snapshot.
    async fn clear(&self) -> Result<()>;

    fn now(&self) -> DateTime<Tz>;
}
