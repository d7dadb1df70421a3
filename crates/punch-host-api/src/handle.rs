//! Process handle abstraction

use serde::{Deserialize, Serialize};

/// Opaque handle to a process on the host
///
/// Created by the host adapter when a process is started or listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessHandle {
    /// Process name as the host reports it (executable file name)
    pub name: String,

    /// Platform-specific payload (opaque to core)
    payload: HandlePayload,
}

impl ProcessHandle {
    pub fn new(name: impl Into<String>, payload: HandlePayload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    pub fn payload(&self) -> &HandlePayload {
        &self.payload
    }
}

/// Platform-specific handle payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "snake_case")]
pub enum HandlePayload {
    /// Linux: process id, plus the process group when we spawned it ourselves
    Linux { pid: u32, pgid: Option<u32> },

    /// Mock for testing
    Mock { id: u64 },
}

impl HandlePayload {
    /// Get the process ID if applicable
    pub fn pid(&self) -> Option<u32> {
        match self {
            HandlePayload::Linux { pid, .. } => Some(*pid),
            HandlePayload::Mock { .. } => None,
        }
    }
}

/// Entry of a running-process snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningProcess {
    pub name: String,
    pub handle: ProcessHandle,
}

impl RunningProcess {
    /// Whether this process answers to `name`.
    ///
    /// Matches the reported process name exactly, or the file name of
    /// `name` when a full path was given.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        if self.name == name {
            return true;
        }
        let program = name.split_whitespace().next().unwrap_or(name);
        std::path::Path::new(program)
            .file_name()
            .map(|f| f.to_string_lossy() == self.name)
            .unwrap_or(false)
    }
}
