//! Goals domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A net-worth target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub achieved_at: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn is_achieved(&self) -> bool {
        self.achieved_at.is_some()
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub id: Option<String>,
    pub name: String,
    pub target_amount: Decimal,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub current: Decimal,
    pub target: Decimal,
    /// 0..=100
    pub progress: Decimal,
    pub remaining: Decimal,
    pub achieved: bool,
}

/// Estimated time until a goal is reached at the observed daily growth rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GoalEta {
    Achieved,
    /// Growth is flat or negative, or there is nothing to compound from.
    Unreachable,
    #[serde(rename_all = "camelCase")]
    Days {
        days: u64,
        projected_date: NaiveDate,
        /// `None` when the goal has no deadline
        on_track: Option<bool>,
    },
}

impl GoalEta {
    /// Days to go; 0 once achieved, `None` if unreachable.
    pub fn days(&self) -> Option<u64> {
        match self {
            GoalEta::Achieved => Some(0),
            GoalEta::Unreachable => None,
            GoalEta::Days { days, .. } => Some(*days),
        }
    }
}

/// Progress and ETA for one goal, as reported over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalOutlook {
    pub goal: Goal,
    pub progress: GoalProgress,
    pub eta: GoalEta,
}
