//! SQLite storage implementation for the position store.

mod model;
mod repository;

pub use model::AppStateDB;
pub use repository::{StateRepository, POSITION_STATE_KEY};
