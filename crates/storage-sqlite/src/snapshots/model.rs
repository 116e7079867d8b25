//! Database model for snapshots.
//!
//! The key, date, capture time and net worth are columns for ordering and
//! inspection; the full snapshot lives in `payload` as JSON.

use chrono::NaiveDate;
use diesel::prelude::*;
use marginwatch_core::snapshots::{Snapshot, SnapshotKey};

#[derive(Queryable, Insertable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SnapshotDB {
    pub id: String,
    pub snapshot_date: NaiveDate,
    pub captured_at: i64,
    pub net_worth: String,
    pub payload: String,
}

impl TryFrom<&Snapshot> for SnapshotDB {
    type Error = serde_json::Error;

    fn try_from(snapshot: &Snapshot) -> Result<Self, Self::Error> {
        Ok(Self {
            id: snapshot.key.to_string(),
            snapshot_date: snapshot.date(),
            captured_at: snapshot.timestamp,
            net_worth: snapshot.net_worth.to_string(),
            payload: serde_json::to_string(snapshot)?,
        })
    }
}

impl TryFrom<SnapshotDB> for Snapshot {
    type Error = serde_json::Error;

    /// The row's `id` is authoritative over the key inside the payload.
    fn try_from(db: SnapshotDB) -> Result<Self, Self::Error> {
        let mut snapshot: Snapshot = serde_json::from_str(&db.payload)?;
        if let Ok(key) = db.id.parse::<SnapshotKey>() {
            snapshot.key = key;
        }
        Ok(snapshot)
    }
}
