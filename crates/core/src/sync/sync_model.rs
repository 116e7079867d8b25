//! Remote sync domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Independently synced slices of user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncCategory {
    State,
    Snapshots,
    Goals,
}

impl SyncCategory {
    pub const ALL: [SyncCategory; 3] = [SyncCategory::State, SyncCategory::Snapshots, SyncCategory::Goals];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncCategory::State => "state",
            SyncCategory::Snapshots => "snapshots",
            SyncCategory::Goals => "goals",
        }
    }
}

impl fmt::Display for SyncCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Not authenticated with the sync target")]
    Unauthenticated,

    #[error("Sync target unreachable: {0}")]
    Unreachable(String),

    #[error("Sync target rejected the payload: {0}")]
    Rejected(String),

    #[error("Malformed remote payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncDirection {
    Push,
    Pull,
}

/// What happened to one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncOutcome {
    Synced,
    /// Pull found nothing stored remotely; local data is untouched.
    Empty,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySync {
    pub category: SyncCategory,
    pub outcome: SyncOutcome,
}

/// Per-category result of a push or pull. Categories that succeeded stay
/// applied even when others failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub direction: SyncDirection,
    pub finished_at: DateTime<Utc>,
    pub categories: Vec<CategorySync>,
}

impl SyncReport {
    pub fn all_succeeded(&self) -> bool {
        self.categories
            .iter()
            .all(|c| !matches!(c.outcome, SyncOutcome::Failed { .. }))
    }

    pub fn failed(&self) -> Vec<SyncCategory> {
        self.categories
            .iter()
            .filter(|c| matches!(c.outcome, SyncOutcome::Failed { .. }))
            .map(|c| c.category)
            .collect()
    }
}
