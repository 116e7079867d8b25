use async_trait::async_trait;
use diesel::prelude::*;
use log::{debug, warn};
use std::sync::Arc;

use super::model::SnapshotDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::snapshots;
use marginwatch_core::errors::Result;
use marginwatch_core::snapshots::{Snapshot, SnapshotKey, SnapshotRepositoryTrait};

pub struct SnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    fn load_snapshots(&self) -> Result<Vec<Snapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = snapshots::table
            .order(snapshots::id.asc())
            .select(SnapshotDB::as_select())
            .load::<SnapshotDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match Snapshot::try_from(row) {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        warn!("Skipping unreadable snapshot {}: {}", id, e);
                        None
                    }
                }
            })
            .collect())
    }

    async fn overwrite_snapshots(&self, series: Vec<Snapshot>) -> Result<()> {
        let rows = series
            .iter()
            .map(SnapshotDB::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;
        debug!("Overwriting snapshot series with {} rows", rows.len());

        self.writer
            .exec(move |conn| {
                diesel::delete(snapshots::table)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if !rows.is_empty() {
                    diesel::insert_into(snapshots::table)
                        .values(&rows)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(())
            })
            .await
    }

    async fn delete_snapshot(&self, key: SnapshotKey) -> Result<usize> {
        let key = key.to_string();
        self.writer
            .exec(move |conn| {
                Ok(diesel::delete(snapshots::table.find(key))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
