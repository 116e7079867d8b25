//! In-memory repositories shared by service tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::errors::{Error, Result};
use crate::goals::{Goal, GoalRepositoryTrait, GoalService};
use crate::positions::{PositionService, PositionState, StateRepositoryTrait};
use crate::snapshots::{Snapshot, SnapshotKey, SnapshotRepositoryTrait, SnapshotService};
use crate::utils::{FixedClock, DEFAULT_MARKET_TZ};

#[derive(Default)]
pub struct InMemoryStateRepository {
    pub state: Mutex<Option<PositionState>>,
}

#[async_trait]
impl StateRepositoryTrait for InMemoryStateRepository {
    fn load_state(&self) -> PositionState {
        self.state.lock().unwrap().clone().unwrap_or_default()
    }

    async fn save_state(&self, state: &PositionState) -> Result<()> {
        *self.state.lock().unwrap() = Some(state.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySnapshotRepository {
    pub series: Mutex<Vec<Snapshot>>,
}

#[async_trait]
impl SnapshotRepositoryTrait for InMemorySnapshotRepository {
    fn load_snapshots(&self) -> Result<Vec<Snapshot>> {
        Ok(self.series.lock().unwrap().clone())
    }

    async fn overwrite_snapshots(&self, snapshots: Vec<Snapshot>) -> Result<()> {
        *self.series.lock().unwrap() = snapshots;
        Ok(())
    }

    async fn delete_snapshot(&self, key: SnapshotKey) -> Result<usize> {
        let mut series = self.series.lock().unwrap();
        let before = series.len();
        series.retain(|s| s.key != key);
        Ok(before - series.len())
    }
}

#[derive(Default)]
pub struct InMemoryGoalRepository {
    pub goals: Mutex<Vec<Goal>>,
}

#[async_trait]
impl GoalRepositoryTrait for InMemoryGoalRepository {
    fn load_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.goals.lock().unwrap().clone())
    }

    async fn insert_new_goal(&self, goal: Goal) -> Result<Goal> {
        self.goals.lock().unwrap().push(goal.clone());
        Ok(goal)
    }

    async fn update_goal(&self, goal_update: Goal) -> Result<Goal> {
        let mut goals = self.goals.lock().unwrap();
        let existing = goals
            .iter_mut()
            .find(|g| g.id == goal_update.id)
            .ok_or_else(|| Error::NotFound(goal_update.id.clone()))?;
        *existing = goal_update.clone();
        Ok(goal_update)
    }

    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize> {
        let mut goals = self.goals.lock().unwrap();
        let before = goals.len();
        goals.retain(|g| g.id != goal_id_to_delete);
        Ok(before - goals.len())
    }

    async fn replace_goals(&self, goals: Vec<Goal>) -> Result<()> {
        *self.goals.lock().unwrap() = goals;
        Ok(())
    }
}

/// Position, snapshot and goal services over fresh in-memory repositories,
/// with the clock frozen at 2024-01-02 17:00 market time.
pub struct Services {
    pub positions: Arc<PositionService>,
    pub snapshots: Arc<SnapshotService>,
    pub goals: Arc<GoalService>,
}

pub fn services() -> Services {
    let clock = FixedClock::at(DEFAULT_MARKET_TZ, 2024, 1, 2, 17, 0, 0).unwrap();
    Services {
        positions: Arc::new(PositionService::new(Arc::new(InMemoryStateRepository::default()))),
        snapshots: Arc::new(SnapshotService::new(
            Arc::new(InMemorySnapshotRepository::default()),
            Arc::new(clock),
        )),
        goals: Arc::new(GoalService::new(Arc::new(InMemoryGoalRepository::default()))),
    }
}
