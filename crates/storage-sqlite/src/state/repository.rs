use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use log::{debug, warn};
use std::sync::Arc;

use super::model::AppStateDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_state::dsl::*;
use marginwatch_core::errors::Result;
use marginwatch_core::positions::{PositionState, StateRepositoryTrait};

pub const POSITION_STATE_KEY: &str = "position_state";

/// Stores the whole position store as one JSON document.
pub struct StateRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl StateRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        StateRepository { pool, writer }
    }

    fn load_raw(&self) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let raw = app_state
            .filter(state_key.eq(POSITION_STATE_KEY))
            .select(state_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(raw)
    }
}

#[async_trait]
impl StateRepositoryTrait for StateRepository {
    fn load_state(&self) -> PositionState {
        let raw = match self.load_raw() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored position state, starting empty");
                return PositionState::default();
            }
            Err(e) => {
                warn!("Failed to read position state, starting empty: {}", e);
                return PositionState::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Stored position state is corrupt, starting empty: {}", e);
            PositionState::default()
        })
    }

    async fn save_state(&self, state: &PositionState) -> Result<()> {
        let row = AppStateDB {
            state_key: POSITION_STATE_KEY.to_string(),
            state_value: serde_json::to_string(state)?,
            updated_at: Utc::now().naive_utc(),
        };
        self.writer
            .exec(move |conn| {
                diesel::replace_into(app_state)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
