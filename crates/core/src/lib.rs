//! Marginwatch Core - positions, risk aggregation, snapshots and trends.
//!
//! This crate holds the domain logic and is database-agnostic: persistence,
//! price feeds, remote sync and advisors are traits implemented elsewhere
//! (the `storage-sqlite` crate and the server).

pub mod advisor;
pub mod constants;
pub mod errors;
pub mod exchange;
pub mod goals;
pub mod market_data;
pub mod positions;
pub mod risk;
pub mod settings;
pub mod snapshots;
pub mod sync;
pub mod trends;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
