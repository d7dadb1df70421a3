//! Host adapter traits

use thiserror::Error;

use crate::{ProcessHandle, RunningProcess};

/// Errors from host adapter operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Stop failed: {0}")]
    StopFailed(String),

    #[error("Process not found")]
    ProcessNotFound,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// Stop mode for process termination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopMode {
    /// Ask the process to exit (SIGTERM on Unix)
    #[default]
    Graceful,
    /// Force immediate termination
    Force,
}

/// Process control - implemented by platform-specific adapters
///
/// Calls are blocking and run inline with the command being dispatched.
pub trait ProcessControl: Send + Sync {
    /// Start a process from a launch target (program path, optionally followed by arguments)
    fn start(&self, target: &str) -> HostResult<ProcessHandle>;

    /// Snapshot of the processes currently running on the host
    fn list_running(&self) -> HostResult<Vec<RunningProcess>>;

    /// Stop a process
    fn stop(&self, handle: &ProcessHandle, mode: StopMode) -> HostResult<()>;

    /// Number of processes on the host, for the startup banner
    fn process_count(&self) -> usize {
        self.list_running().map(|p| p.len()).unwrap_or(0)
    }

    /// Optional: check if the host adapter is healthy
    fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_mode_default() {
        assert_eq!(StopMode::default(), StopMode::Graceful);
    }
}
