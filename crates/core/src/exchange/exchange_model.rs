use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::goals::Goal;
use crate::positions::PositionState;
use crate::snapshots::Snapshot;

pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// Everything a user owns, as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    pub state: PositionState,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub state_version: u64,
    pub positions: usize,
    pub debts: usize,
    pub snapshots: usize,
    pub goals: usize,
}
