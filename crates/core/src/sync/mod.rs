//! Remote sync - push and pull of state, snapshots and goals.

mod sync_model;
mod sync_service;
mod sync_traits;

pub use sync_model::*;
pub use sync_service::SyncService;
pub use sync_traits::{RemoteSyncTrait, SyncServiceTrait};
