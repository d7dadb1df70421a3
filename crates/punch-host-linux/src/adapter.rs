//! Linux process control implementation

use nix::sys::signal::Signal;
use std::collections::HashMap;
use std::sync::Mutex;
use sysinfo::{ProcessesToUpdate, System};
use tracing::{debug, info, warn};

use punch_host_api::{
    HandlePayload, HostError, HostResult, ProcessControl, ProcessHandle, RunningProcess,
    StopMode,
};

use crate::{signal_pid, ManagedProcess};

/// Linux process control
pub struct LinuxProcessControl {
    children: Mutex<HashMap<u32, ManagedProcess>>,
    system: Mutex<System>,
}

impl LinuxProcessControl {
    pub fn new() -> Self {
        Self {
            children: Mutex::new(HashMap::new()),
            system: Mutex::new(System::new()),
        }
    }

    /// Reap children that exited since the last call
    fn reap_children(&self) {
        let Ok(mut children) = self.children.lock() else {
            warn!("Children lock poisoned");
            return;
        };
        children.retain(|pid, child| {
            let exited = child.has_exited();
            if exited {
                debug!(pid, "Reaped exited child");
            }
            !exited
        });
    }

    fn lock_err<T>(_: T) -> HostError {
        HostError::Internal("lock poisoned".into())
    }
}

impl Default for LinuxProcessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessControl for LinuxProcessControl {
    fn start(&self, target: &str) -> HostResult<ProcessHandle> {
        self.reap_children();

        let proc = ManagedProcess::spawn(target)?;
        let name = target
            .split_whitespace()
            .next()
            .and_then(|program| std::path::Path::new(program).file_name())
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.to_string());

        let handle = ProcessHandle::new(
            name,
            HandlePayload::Linux {
                pid: proc.pid,
                pgid: Some(proc.pgid),
            },
        );

        info!(pid = proc.pid, target, "Process started");
        self.children
            .lock()
            .map_err(Self::lock_err)?
            .insert(proc.pid, proc);

        Ok(handle)
    }

    fn list_running(&self) -> HostResult<Vec<RunningProcess>> {
        let mut system = self.system.lock().map_err(Self::lock_err)?;
        system.refresh_processes(ProcessesToUpdate::All);

        let own_pid = std::process::id();
        let mut running: Vec<RunningProcess> = system
            .processes()
            .iter()
            .filter(|(pid, _)| pid.as_u32() != own_pid)
            .map(|(pid, process)| {
                let name = process.name().to_string_lossy().into_owned();
                RunningProcess {
                    name: name.clone(),
                    handle: ProcessHandle::new(
                        name,
                        HandlePayload::Linux {
                            pid: pid.as_u32(),
                            pgid: None,
                        },
                    ),
                }
            })
            .collect();
        running.sort_by_key(|p| p.handle.payload().pid());

        debug!(count = running.len(), "Process snapshot taken");
        Ok(running)
    }

    fn stop(&self, handle: &ProcessHandle, mode: StopMode) -> HostResult<()> {
        let HandlePayload::Linux { pid, .. } = handle.payload() else {
            return Err(HostError::ProcessNotFound);
        };

        let sig = match mode {
            StopMode::Graceful => Signal::SIGTERM,
            StopMode::Force => Signal::SIGKILL,
        };

        let children = self.children.lock().map_err(Self::lock_err)?;
        match children.get(pid) {
            // Ours: take the whole process group down
            Some(child) => child.signal_group(sig),
            None => signal_pid(*pid, sig),
        }
    }

    fn is_healthy(&self) -> bool {
        self.children.lock().is_ok() && self.system.lock().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn start_list_and_stop() {
        let host = LinuxProcessControl::new();

        let handle = host.start("sleep 30").unwrap();
        assert_eq!(handle.name, "sleep");
        let pid = handle.payload().pid().unwrap();

        std::thread::sleep(Duration::from_millis(50));
        let running = host.list_running().unwrap();
        assert!(running.iter().any(|p| p.handle.payload().pid() == Some(pid)));

        host.stop(&handle, StopMode::Graceful).unwrap();
    }

    #[test]
    fn start_missing_program_fails() {
        let host = LinuxProcessControl::new();
        let result = host.start("/nonexistent/punchclock-test-binary");
        assert!(matches!(result, Err(HostError::SpawnFailed(_))));
    }

    #[test]
    fn mock_handle_is_rejected() {
        let host = LinuxProcessControl::new();
        let handle = ProcessHandle::new("x", HandlePayload::Mock { id: 1 });
        assert!(matches!(
            host.stop(&handle, StopMode::Force),
            Err(HostError::ProcessNotFound)
        ));
    }
}
