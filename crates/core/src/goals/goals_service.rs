use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::goals_calculator::{goal_eta, goal_progress};
use super::goals_model::{Goal, GoalOutlook, NewGoal};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::errors::{Result, ValidationError};

pub struct GoalService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
}

impl GoalService {
    pub fn new(goal_repo: Arc<dyn GoalRepositoryTrait>) -> Self {
        GoalService { goal_repo }
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self) -> Result<Vec<Goal>> {
        self.goal_repo.load_goals()
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        Self::validate_name(&new_goal.name)?;
        let goal = Goal {
            id: new_goal
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_goal.name.trim().to_string(),
            target_amount: new_goal.target_amount,
            deadline: new_goal.deadline,
            created_at: Utc::now(),
            achieved_at: None,
        };
        self.goal_repo.insert_new_goal(goal).await
    }

    async fn update_goal(&self, updated_goal_data: Goal) -> Result<Goal> {
        Self::validate_name(&updated_goal_data.name)?;
        self.goal_repo.update_goal(updated_goal_data).await
    }

    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize> {
        self.goal_repo.delete_goal(goal_id_to_delete).await
    }

    async fn replace_goals(&self, goals: Vec<Goal>) -> Result<()> {
        self.goal_repo.replace_goals(goals).await
    }

    async fn mark_achievements(&self, net_worth: Decimal, now: DateTime<Utc>) -> Result<Vec<Goal>> {
        let mut reached = Vec::new();
        for mut goal in self.goal_repo.load_goals()? {
            if goal.is_achieved() || !goal_progress(&goal, net_worth).achieved {
                continue;
            }
            goal.achieved_at = Some(now);
            info!("Goal '{}' reached at net worth {}", goal.name, net_worth);
            reached.push(self.goal_repo.update_goal(goal).await?);
        }
        Ok(reached)
    }

    fn outlook(
        &self,
        net_worth: Decimal,
        daily_rate: Decimal,
        today: NaiveDate,
    ) -> Result<Vec<GoalOutlook>> {
        Ok(self
            .goal_repo
            .load_goals()?
            .into_iter()
            .map(|goal| GoalOutlook {
                progress: goal_progress(&goal, net_worth),
                eta: goal_eta(&goal, net_worth, daily_rate, today),
                goal,
            })
            .collect())
    }
}
