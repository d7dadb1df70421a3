//! Shared types for punchclock
//!
//! This crate defines the vocabulary shared by the core, the stores and
//! the terminal front end:
//! - Command keywords (the closed, ordered command set)
//! - Session status and elapsed-time metrics
//! - Time log entries

mod commands;
mod events;
mod types;

pub use commands::*;
pub use events::*;
pub use types::*;

/// Delimiter joining several launch targets inside one alias value
pub const MULTI_TARGET_DELIMITER: char = '|';
