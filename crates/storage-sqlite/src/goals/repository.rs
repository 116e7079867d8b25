use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use super::model::GoalDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::goals;
use marginwatch_core::errors::{Error, Result};
use marginwatch_core::goals::{Goal, GoalRepositoryTrait};

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn load_goals(&self) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let goals_db = goals::table
            .order(goals::created_at.asc())
            .load::<GoalDB>(&mut conn)
            .into_core()?;
        Ok(goals_db.into_iter().map(Goal::from).collect())
    }

    async fn insert_new_goal(&self, goal: Goal) -> Result<Goal> {
        let goal_db = GoalDB::from(goal);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .execute(conn)
                    .into_core()?;
                Ok(Goal::from(goal_db))
            })
            .await
    }

    async fn update_goal(&self, goal_update: Goal) -> Result<Goal> {
        let goal_db = GoalDB::from(goal_update);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let updated = diesel::update(goals::table.find(goal_db.id.clone()))
                    .set(&goal_db)
                    .execute(conn)
                    .into_core()?;
                if updated == 0 {
                    return Err(Error::NotFound(format!("Goal {}", goal_db.id)));
                }
                Ok(Goal::from(goal_db))
            })
            .await
    }

    async fn delete_goal(&self, goal_id_to_delete: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(goals::table.find(goal_id_to_delete))
                    .execute(conn)
                    .into_core()?)
            })
            .await
    }

    async fn replace_goals(&self, new_goals: Vec<Goal>) -> Result<()> {
        let rows: Vec<GoalDB> = new_goals.into_iter().map(GoalDB::from).collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::delete(goals::table)
                    .execute(conn)
                    .into_core()?;
                if !rows.is_empty() {
                    diesel::insert_into(goals::table)
                        .values(&rows)
                        .execute(conn)
                        .into_core()?;
                }
                Ok(())
            })
            .await
    }
}
