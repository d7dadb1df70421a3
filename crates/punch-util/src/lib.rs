//! Shared utilities for punchclock
//!
//! This crate provides:
//! - ID types (SessionId)
//! - Time utilities (monotonic time, mock-able wall clock, moments, span formatting)
//! - Default paths for config, data, and log directories
//! - Identity queries for the startup banner

mod identity;
mod ids;
mod paths;
mod time;

pub use identity::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
