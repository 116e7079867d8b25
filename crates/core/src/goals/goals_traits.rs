use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalOutlook, NewGoal};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn load_goals(&self) -> Result<Vec<Goal>>;
    async fn insert_new_goal(&self, goal: Goal) -> Result<Goal>;
    async fn update_goal(&self, goal_update: Goal) -> Result<Goal>;
    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize>;
    /// Replaces every stored goal (import, remote pull).
    async fn replace_goals(&self, goals: Vec<Goal>) -> Result<()>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self) -> Result<Vec<Goal>>;
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn update_goal(&self, updated_goal_data: Goal) -> Result<Goal>;
    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize>;
    async fn replace_goals(&self, goals: Vec<Goal>) -> Result<()>;

    /// Stamps `achieved_at` on goals reached at `net_worth`. Returns the
    /// newly achieved goals.
    async fn mark_achievements(&self, net_worth: Decimal, now: DateTime<Utc>) -> Result<Vec<Goal>>;

    /// Progress and ETA for every goal.
    fn outlook(&self, net_worth: Decimal, daily_rate: Decimal, today: NaiveDate)
        -> Result<Vec<GoalOutlook>>;
}
