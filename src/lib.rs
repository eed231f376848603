pub mod config;
pub mod engines;
pub mod error;
pub mod pool;
pub mod simulation;
pub mod types;

pub use error::{CodonSoupError, Result, SyncError};
