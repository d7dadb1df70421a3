//! Persistence layer for punchclock
//!
//! Provides:
//! - Alias namespaces (key-value, insertion ordered) with per-account access rules
//! - Plain-text time log sinks (file backed, and in-memory for tests)

mod acl;
mod sqlite;
mod timelog;
mod traits;

pub use acl::*;
pub use sqlite::*;
pub use timelog::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied for {account} on {path}")]
    AccessDenied { account: String, path: String },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
