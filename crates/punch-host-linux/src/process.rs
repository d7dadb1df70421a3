//! Process management utilities

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use tracing::debug;

use punch_host_api::{HostError, HostResult};

/// Child process started by punchclock, leader of its own process group
pub struct ManagedProcess {
    pub child: Child,
    pub pid: u32,
    pub pgid: u32,
}

impl ManagedProcess {
    /// Spawn a launch target in its own session.
    ///
    /// The target is a program followed by whitespace-separated arguments.
    /// The child inherits our environment; stdio is detached so the
    /// interactive prompt keeps the terminal.
    pub fn spawn(target: &str) -> HostResult<Self> {
        let argv: Vec<&str> = target.split_whitespace().collect();
        let Some((program, args)) = argv.split_first() else {
            return Err(HostError::SpawnFailed("Empty target".into()));
        };

        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        // SAFETY: setsid is async-signal-safe and runs in the forked child
        unsafe {
            cmd.pre_exec(|| {
                nix::unistd::setsid().map_err(std::io::Error::from)?;
                Ok(())
            });
        }

        let child = cmd
            .spawn()
            .map_err(|e| HostError::SpawnFailed(format!("Failed to spawn {}: {}", program, e)))?;

        let pid = child.id();
        let pgid = pid; // After setsid, pid == pgid

        debug!(pid, pgid, program = %program, "Process spawned");

        Ok(Self { child, pid, pgid })
    }

    /// Send a signal to the whole process group
    pub fn signal_group(&self, sig: Signal) -> HostResult<()> {
        let pgid = Pid::from_raw(-(self.pgid as i32)); // Negative for process group

        match signal::kill(pgid, sig) {
            Ok(()) => {
                debug!(pgid = self.pgid, signal = ?sig, "Signalled process group");
                Ok(())
            }
            // Process already gone
            Err(nix::errno::Errno::ESRCH) => Ok(()),
            Err(nix::errno::Errno::EPERM) => Err(HostError::PermissionDenied(format!(
                "Not allowed to signal process group {}",
                self.pgid
            ))),
            Err(e) => Err(HostError::StopFailed(format!("Failed to send {:?}: {}", sig, e))),
        }
    }

    /// Whether the process has exited (non-blocking, reaps it if so)
    pub fn has_exited(&mut self) -> bool {
        !matches!(self.child.try_wait(), Ok(None))
    }
}

/// Send a signal to a single process we did not spawn
pub fn signal_pid(pid: u32, sig: Signal) -> HostResult<()> {
    match signal::kill(Pid::from_raw(pid as i32), sig) {
        Ok(()) => {
            debug!(pid, signal = ?sig, "Signalled process");
            Ok(())
        }
        Err(nix::errno::Errno::ESRCH) => Ok(()),
        Err(nix::errno::Errno::EPERM) => Err(HostError::PermissionDenied(format!(
            "Not allowed to signal process {}",
            pid
        ))),
        Err(e) => Err(HostError::StopFailed(format!("Failed to send {:?}: {}", sig, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn spawn_simple_process() {
        let mut proc = ManagedProcess::spawn("true").unwrap();
        let status = proc.child.wait().unwrap();
        assert!(status.success());
    }

    #[test]
    fn spawn_with_args() {
        let mut proc = ManagedProcess::spawn("echo hello").unwrap();
        let status = proc.child.wait().unwrap();
        assert!(status.success());
    }

    #[test]
    fn spawn_empty_target_fails() {
        assert!(matches!(
            ManagedProcess::spawn("   "),
            Err(HostError::SpawnFailed(_))
        ));
    }

    #[test]
    fn spawn_missing_program_fails() {
        assert!(ManagedProcess::spawn("/nonexistent/punchclock-test-binary").is_err());
    }

    #[test]
    fn terminate_sleeping_process() {
        let mut proc = ManagedProcess::spawn("sleep 60").unwrap();
        std::thread::sleep(Duration::from_millis(50));

        proc.signal_group(Signal::SIGTERM).unwrap();
        let status = proc.child.wait().unwrap();
        assert!(!status.success());
        assert!(proc.has_exited());
    }
}
