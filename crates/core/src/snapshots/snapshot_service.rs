use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::snapshot_model::{Snapshot, SnapshotKey};
use super::snapshot_retention::{apply_retention, normalize_series, should_capture};
use super::snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
use crate::errors::{Error, Result};
use crate::risk::AnalysisResult;
use crate::utils::Clock;

pub struct SnapshotService {
    repository: Arc<dyn SnapshotRepositoryTrait>,
    clock: Arc<dyn Clock>,
    // Serializes load-apply-overwrite cycles so concurrent captures never
    // overwrite each other's result.
    record_lock: Mutex<()>,
}

impl SnapshotService {
    pub fn new(repository: Arc<dyn SnapshotRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            record_lock: Mutex::new(()),
        }
    }

    async fn record_locked(&self, snapshot: Snapshot) -> Result<Vec<Snapshot>> {
        let today = self.clock.today();
        let series = self.repository.load_snapshots()?;
        let before = series.len();
        let retained = apply_retention(series, snapshot, today);
        self.repository.overwrite_snapshots(retained.clone()).await?;
        debug!(
            "Recorded snapshot; series {} -> {} entries",
            before,
            retained.len()
        );
        Ok(retained)
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    fn list(&self) -> Result<Vec<Snapshot>> {
        let mut series = self.repository.load_snapshots()?;
        series.sort_by_key(|s| s.key);
        Ok(series)
    }

    fn latest(&self) -> Result<Option<Snapshot>> {
        Ok(self.list()?.pop())
    }

    fn should_capture(&self) -> Result<bool> {
        let now = self.clock.now().naive_local();
        let last = self.list()?.last().map(Snapshot::date);
        Ok(should_capture(now, last))
    }

    async fn record(&self, snapshot: Snapshot) -> Result<Vec<Snapshot>> {
        let _guard = self.record_lock.lock().await;
        self.record_locked(snapshot).await
    }

    async fn maybe_capture(&self, analysis: &AnalysisResult) -> Result<Option<Snapshot>> {
        let _guard = self.record_lock.lock().await;
        let now = self.clock.now();
        let last = self.list()?.last().map(Snapshot::date);
        if !should_capture(now.naive_local(), last) {
            return Ok(None);
        }

        let snapshot = Snapshot::capture(analysis, now);
        info!("Capturing daily snapshot {}", snapshot.key);
        self.record_locked(snapshot.clone()).await?;
        Ok(Some(snapshot))
    }

    async fn force_capture(&self, analysis: &AnalysisResult) -> Result<Snapshot> {
        let _guard = self.record_lock.lock().await;
        let snapshot = Snapshot::capture(analysis, self.clock.now());
        info!("Capturing snapshot {} on request", snapshot.key);
        self.record_locked(snapshot.clone()).await?;
        Ok(snapshot)
    }

    async fn delete(&self, key: SnapshotKey) -> Result<()> {
        let _guard = self.record_lock.lock().await;
        match self.repository.delete_snapshot(key).await? {
            0 => Err(Error::NotFound(format!("Snapshot {}", key))),
            _ => Ok(()),
        }
    }

    async fn replace_all(&self, snapshots: Vec<Snapshot>) -> Result<Vec<Snapshot>> {
        let _guard = self.record_lock.lock().await;
        let retained = normalize_series(snapshots, self.clock.today());
        self.repository.overwrite_snapshots(retained.clone()).await?;
        Ok(retained)
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.record_lock.lock().await;
        self.repository.overwrite_snapshots(Vec::new()).await
    }

    fn now(&self) -> DateTime<Tz> {
        self.clock.now()
    }
}
