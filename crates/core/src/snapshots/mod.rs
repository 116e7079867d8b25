//! Net-worth snapshots: capture policy, bounded retention and history.

mod snapshot_model;
mod snapshot_retention;
mod snapshot_service;
mod snapshot_traits;


pub use snapshot_model::{Snapshot, SnapshotKey};
#[cfg(test)]
pub(crate) use snapshot_model::fixtures;
pub use snapshot_retention::{apply_retention, in_capture_window, normalize_series, should_capture};
pub use snapshot_service::SnapshotService;
pub use snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
