//! SQLite storage implementation for Marginwatch.
//!
//! This crate provides all persistence for the monitor using Diesel ORM with
//! SQLite. It implements the repository traits defined in `marginwatch-core`:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for position state, snapshots and goals
//! - A directory-backed remote for sync
//!
//! This crate is the only place in the application where Diesel dependencies exist.

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

// Repository implementations
pub mod goals;
pub mod snapshots;
pub mod state;
pub mod sync;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use goals::GoalRepository;
pub use snapshots::SnapshotRepository;
pub use state::StateRepository;
pub use sync::DirectoryRemote;

// Re-export from marginwatch-core for convenience
pub use marginwatch_core::errors::{DatabaseError, Error, Result};
