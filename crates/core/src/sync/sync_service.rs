use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use serde_json::Value;
use std::sync::Arc;

use super::sync_model::{CategorySync, SyncCategory, SyncDirection, SyncError, SyncOutcome, SyncReport};
use super::sync_traits::{RemoteSyncTrait, SyncServiceTrait};
use crate::errors::{Error, Result};
use crate::goals::{Goal, GoalServiceTrait};
use crate::positions::{PositionServiceTrait, PositionState};
use crate::snapshots::{Snapshot, SnapshotServiceTrait};

/// Pushes and pulls each category on its own so one failure never blocks
/// or rolls back the others.
pub struct SyncService {
    positions: Arc<dyn PositionServiceTrait>,
    snapshots: Arc<dyn SnapshotServiceTrait>,
    goals: Arc<dyn GoalServiceTrait>,
    remote: Arc<dyn RemoteSyncTrait>,
}

impl SyncService {
    pub fn new(
        positions: Arc<dyn PositionServiceTrait>,
        snapshots: Arc<dyn SnapshotServiceTrait>,
        goals: Arc<dyn GoalServiceTrait>,
        remote: Arc<dyn RemoteSyncTrait>,
    ) -> Self {
        Self {
            positions,
            snapshots,
            goals,
            remote,
        }
    }

    fn local_payload(&self, category: SyncCategory) -> Result<Value> {
        let value = match category {
            SyncCategory::State => serde_json::to_value(self.positions.get_state())?,
            SyncCategory::Snapshots => serde_json::to_value(self.snapshots.list()?)?,
            SyncCategory::Goals => serde_json::to_value(self.goals.get_goals()?)?,
        };
        Ok(value)
    }

    async fn apply_remote(&self, category: SyncCategory, payload: Value) -> Result<()> {
        let malformed = |e: serde_json::Error| Error::Import(SyncError::Malformed(e.to_string()).to_string());
        match category {
            SyncCategory::State => {
                let state: PositionState = serde_json::from_value(payload).map_err(malformed)?;
                self.positions.replace_state(state).await?;
            }
            SyncCategory::Snapshots => {
                let series: Vec<Snapshot> = serde_json::from_value(payload).map_err(malformed)?;
                self.snapshots.replace_all(series).await?;
            }
            SyncCategory::Goals => {
                let goals: Vec<Goal> = serde_json::from_value(payload).map_err(malformed)?;
                self.goals.replace_goals(goals).await?;
            }
        }
        Ok(())
    }

    async fn push_one(&self, category: SyncCategory) -> SyncOutcome {
        let payload = match self.local_payload(category) {
            Ok(p) => p,
            Err(e) => return failed(category, SyncDirection::Push, e.to_string()),
        };
        match self.remote.push(category, payload).await {
            Ok(()) => SyncOutcome::Synced,
            Err(e) => failed(category, SyncDirection::Push, e.to_string()),
        }
    }

    async fn pull_one(&self, category: SyncCategory) -> SyncOutcome {
        match self.remote.pull(category).await {
            Ok(None) => SyncOutcome::Empty,
            Ok(Some(payload)) => match self.apply_remote(category, payload).await {
                Ok(()) => SyncOutcome::Synced,
                Err(e) => failed(category, SyncDirection::Pull, e.to_string()),
            },
            Err(e) => failed(category, SyncDirection::Pull, e.to_string()),
        }
    }
}

fn failed(category: SyncCategory, direction: SyncDirection, reason: String) -> SyncOutcome {
    warn!("Sync {:?} of {} failed: {}", direction, category, reason);
    SyncOutcome::Failed { reason }
}

#[async_trait]
impl SyncServiceTrait for SyncService {
    async fn push_all(&self) -> Result<SyncReport> {
        let mut categories = Vec::with_capacity(SyncCategory::ALL.len());
        for category in SyncCategory::ALL {
            let outcome = self.push_one(category).await;
            categories.push(CategorySync { category, outcome });
        }
        let report = SyncReport {
            direction: SyncDirection::Push,
            finished_at: Utc::now(),
            categories,
        };
        info!("Sync push finished (all succeeded: {})", report.all_succeeded());
        Ok(report)
    }

    async fn pull_all(&self) -> Result<SyncReport> {
        let mut categories = Vec::with_capacity(SyncCategory::ALL.len());
        for category in SyncCategory::ALL {
            let outcome = self.pull_one(category).await;
            categories.push(CategorySync { category, outcome });
        }
        let report = SyncReport {
            direction: SyncDirection::Pull,
            finished_at: Utc::now(),
            categories,
        };
        info!("Sync pull finished (all succeeded: {})", report.all_succeeded());
        Ok(report)
    }
}
