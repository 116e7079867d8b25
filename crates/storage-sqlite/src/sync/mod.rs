//! File-backed sync target.

mod directory_remote;

pub use directory_remote::DirectoryRemote;
