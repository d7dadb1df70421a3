//! Mock host adapter for testing

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::{
    HandlePayload, HostError, HostResult, ProcessControl, ProcessHandle, RunningProcess,
    StopMode,
};

/// Mock process state for testing
#[derive(Debug, Clone)]
pub struct MockProcess {
    pub mock_id: u64,
    pub name: String,
    pub target: String,
    pub running: bool,
}

/// Mock process control for unit/integration testing
#[derive(Default)]
pub struct MockProcessControl {
    next_id: AtomicU64,
    processes: Arc<Mutex<HashMap<u64, MockProcess>>>,
    launched: Arc<Mutex<Vec<String>>>,
    snapshots: AtomicU64,

    /// Targets whose launch should fail
    pub fail_targets: Arc<Mutex<HashSet<String>>>,

    /// Configure stop to fail
    pub fail_stop: Arc<Mutex<bool>>,
}

impl MockProcessControl {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Default::default()
        }
    }

    /// Make launches of `target` fail
    pub fn fail_on(&self, target: impl Into<String>) {
        self.fail_targets.lock().unwrap().insert(target.into());
    }

    /// Targets successfully started, in launch order
    pub fn launched(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }

    /// Names of processes still running
    pub fn running_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .processes
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.running)
            .map(|p| p.name.clone())
            .collect();
        names.sort();
        names
    }

    /// How many times a running-process snapshot was taken
    pub fn snapshot_count(&self) -> u64 {
        self.snapshots.load(Ordering::SeqCst)
    }

    fn process_name(target: &str) -> String {
        let program = target.split_whitespace().next().unwrap_or(target);
        std::path::Path::new(program)
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.to_string())
    }
}

impl ProcessControl for MockProcessControl {
    fn start(&self, target: &str) -> HostResult<ProcessHandle> {
        let target = target.trim();
        if target.is_empty() {
            return Err(HostError::SpawnFailed("Empty target".into()));
        }
        if self.fail_targets.lock().unwrap().contains(target) {
            return Err(HostError::SpawnFailed(format!(
                "Mock spawn failure for {}",
                target
            )));
        }

        let mock_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let name = Self::process_name(target);

        self.processes.lock().unwrap().insert(
            mock_id,
            MockProcess {
                mock_id,
                name: name.clone(),
                target: target.to_string(),
                running: true,
            },
        );
        self.launched.lock().unwrap().push(target.to_string());

        debug!(mock_id, target, "Mock process started");
        Ok(ProcessHandle::new(name, HandlePayload::Mock { id: mock_id }))
    }

    fn list_running(&self) -> HostResult<Vec<RunningProcess>> {
        self.snapshots.fetch_add(1, Ordering::SeqCst);

        let processes = self.processes.lock().unwrap();
        let mut running: Vec<_> = processes
            .values()
            .filter(|p| p.running)
            .map(|p| RunningProcess {
                name: p.name.clone(),
                handle: ProcessHandle::new(p.name.clone(), HandlePayload::Mock { id: p.mock_id }),
            })
            .collect();
        running.sort_by_key(|p| match p.handle.payload() {
            HandlePayload::Mock { id } => *id,
            HandlePayload::Linux { pid, .. } => u64::from(*pid),
        });
        Ok(running)
    }

    fn stop(&self, handle: &ProcessHandle, _mode: StopMode) -> HostResult<()> {
        if *self.fail_stop.lock().unwrap() {
            return Err(HostError::StopFailed("Mock stop failure".into()));
        }

        let mock_id = match handle.payload() {
            HandlePayload::Mock { id } => *id,
            _ => return Err(HostError::ProcessNotFound),
        };

        let mut processes = self.processes.lock().unwrap();
        match processes.get_mut(&mock_id) {
            Some(process) if process.running => {
                process.running = false;
                Ok(())
            }
            _ => Err(HostError::ProcessNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_start_and_stop() {
        let host = MockProcessControl::new();

        let handle = host.start("/usr/bin/gedit notes.txt").unwrap();
        assert_eq!(handle.name, "gedit");
        assert_eq!(host.running_names(), vec!["gedit".to_string()]);

        host.stop(&handle, StopMode::Force).unwrap();
        assert!(host.running_names().is_empty());

        // Stopping twice reports the process as gone
        assert!(matches!(
            host.stop(&handle, StopMode::Force),
            Err(HostError::ProcessNotFound)
        ));
    }

    #[test]
    fn mock_start_failure() {
        let host = MockProcessControl::new();
        host.fail_on("broken");

        assert!(matches!(host.start("broken"), Err(HostError::SpawnFailed(_))));
        assert!(host.start("fine").is_ok());
        assert_eq!(host.launched(), vec!["fine".to_string()]);
    }

    #[test]
    fn mock_list_running_counts_snapshots() {
        let host = MockProcessControl::new();
        host.start("a").unwrap();
        host.start("b").unwrap();

        let running = host.list_running().unwrap();
        let names: Vec<_> = running.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(host.snapshot_count(), 1);
        assert_eq!(host.process_count(), 2);
    }
}
