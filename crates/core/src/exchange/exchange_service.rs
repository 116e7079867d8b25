use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use super::exchange_model::{ExportBundle, ImportSummary, EXPORT_FORMAT_VERSION};
use crate::errors::{Error, Result};
use crate::goals::{Goal, GoalServiceTrait};
use crate::positions::{PositionServiceTrait, PositionState};
use crate::snapshots::{Snapshot, SnapshotServiceTrait};

pub fn export_bundle(
    state: PositionState,
    snapshots: Vec<Snapshot>,
    goals: Vec<Goal>,
    exported_at: DateTime<Utc>,
) -> ExportBundle {
    ExportBundle {
        format_version: EXPORT_FORMAT_VERSION,
        exported_at,
        state,
        snapshots,
        goals,
    }
}

/// Parses an exported document. Rejects bundles from a newer format.
pub fn parse_bundle(raw: &str) -> Result<ExportBundle> {
    let bundle: ExportBundle =
        serde_json::from_str(raw).map_err(|e| Error::Import(format!("Invalid export file: {}", e)))?;
    if bundle.format_version > EXPORT_FORMAT_VERSION {
        return Err(Error::Import(format!(
            "Export format {} is newer than supported format {}",
            bundle.format_version, EXPORT_FORMAT_VERSION
        )));
    }
    Ok(bundle)
}

/// Checks a parsed bundle before anything is replaced: every goal needs a
/// unique, non-blank id and a name.
pub fn validate_bundle(bundle: &ExportBundle) -> Result<()> {
    let mut ids = HashSet::new();
    for goal in &bundle.goals {
        if goal.id.trim().is_empty() {
            return Err(Error::Import("Goal without an id".to_string()));
        }
        if goal.name.trim().is_empty() {
            return Err(Error::Import(format!("Goal {} has no name", goal.id)));
        }
        if !ids.insert(goal.id.as_str()) {
            return Err(Error::Import(format!("Duplicate goal id {}", goal.id)));
        }
    }
    Ok(())
}

/// Export and whole-replace import across the three stores.
pub struct ExchangeService {
    positions: Arc<dyn PositionServiceTrait>,
    snapshots: Arc<dyn SnapshotServiceTrait>,
    goals: Arc<dyn GoalServiceTrait>,
}

impl ExchangeService {
    pub fn new(
        positions: Arc<dyn PositionServiceTrait>,
        snapshots: Arc<dyn SnapshotServiceTrait>,
        goals: Arc<dyn GoalServiceTrait>,
    ) -> Self {
        Self {
            positions,
            snapshots,
            goals,
        }
    }

    pub fn export(&self) -> Result<ExportBundle> {
        Ok(export_bundle(
            self.positions.get_state(),
            self.snapshots.list()?,
            self.goals.get_goals()?,
            Utc::now(),
        ))
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export()?)?)
    }

    /// Replaces state, snapshots and goals with the bundle's contents.
    ///
    /// All or nothing: the bundle is validated first, the persisted stores
    /// are replaced next (snapshots are restored if the goals fail), and the
    /// in-memory position state is swapped last.
    pub async fn import(&self, bundle: ExportBundle) -> Result<ImportSummary> {
        validate_bundle(&bundle)?;

        let previous_snapshots = self.snapshots.list()?;
        let snapshots = self.snapshots.replace_all(bundle.snapshots).await?;
        if let Err(e) = self.goals.replace_goals(bundle.goals.clone()).await {
            warn!(
                "Import aborted while replacing goals, restoring {} snapshots: {}",
                previous_snapshots.len(),
                e
            );
            if let Err(restore) = self.snapshots.replace_all(previous_snapshots).await {
                error!("Failed to restore snapshots after aborted import: {}", restore);
            }
            return Err(e);
        }
        let state = self.positions.replace_state(bundle.state).await?;

        let summary = ImportSummary {
            state_version: state.version,
            positions: state.local_equities.len()
                + state.foreign_equities.len()
                + state.crypto_positions.len(),
            debts: state.debts.len(),
            snapshots: snapshots.len(),
            goals: bundle.goals.len(),
        };
        info!(
            "Imported {} positions, {} debts, {} snapshots, {} goals",
            summary.positions, summary.debts, summary.snapshots, summary.goals
        );
        Ok(summary)
    }

    pub async fn import_json(&self, raw: &str) -> Result<ImportSummary> {
        self.import(parse_bundle(raw)?).await
    }
}
