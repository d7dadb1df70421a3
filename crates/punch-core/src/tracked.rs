//! Snapshot of running processes used by CLOSE

use punch_host_api::{HostResult, ProcessControl, RunningProcess};
use tracing::debug;

/// Transient snapshot of the processes running on the host.
///
/// Refreshed after each successful launch; never persisted.
#[derive(Debug, Clone, Default)]
pub struct TrackedProcesses {
    processes: Vec<RunningProcess>,
}

impl TrackedProcesses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with the host's current process list
    pub fn refresh(&mut self, host: &dyn ProcessControl) -> HostResult<()> {
        self.processes = host.list_running()?;
        debug!(count = self.processes.len(), "Process snapshot refreshed");
        Ok(())
    }

    /// Every tracked process answering to `name`
    pub fn find(&self, name: &str) -> Vec<&RunningProcess> {
        self.processes.iter().filter(|p| p.matches(name)).collect()
    }

    /// Drop entries answering to `name`
    pub fn remove(&mut self, name: &str) {
        self.processes.retain(|p| !p.matches(name));
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }
}
