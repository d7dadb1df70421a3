//! Linux host adapter for punchclock
//!
//! Provides:
//! - Process spawning detached into its own session and process group
//! - Graceful (SIGTERM) and forceful (SIGKILL) termination
//! - Running-process snapshots for locating processes by name

mod adapter;
mod process;

pub use adapter::*;
pub use process::*;
