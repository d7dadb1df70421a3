//! Per-session state shared by the command handlers

use punch_api::{CommandKeyword, EntryKind, LogEntry};
use punch_host_api::ProcessControl;
use punch_store::TimeLog;
use punch_util::SessionId;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{AliasStore, SessionStateMachine, TrackedProcesses};

/// Append an entry, reporting sink failures through tracing only
pub fn record(log: &dyn TimeLog, entry: LogEntry) {
    if let Err(e) = log.append(&entry) {
        warn!(kind = %entry.kind, error = %e, "Failed to write time log entry");
    }
}

/// Everything a handler may touch.
///
/// Constructing a context starts a new session; there is no global state.
pub struct SessionContext {
    pub session_id: SessionId,
    pub session: SessionStateMachine,
    pub aliases: AliasStore,
    pub host: Arc<dyn ProcessControl>,
    pub log: Arc<dyn TimeLog>,
    pub tracked: TrackedProcesses,
    /// Whether system-affecting commands are honoured
    pub system_events: bool,
    /// Hotkey bindings registered with HOTKEY
    pub hotkeys: BTreeMap<char, CommandKeyword>,
}

impl SessionContext {
    pub fn new(
        aliases: AliasStore,
        host: Arc<dyn ProcessControl>,
        log: Arc<dyn TimeLog>,
        system_events: bool,
    ) -> Self {
        let session_id = SessionId::new();
        info!(session_id = %session_id, system_events, "Session context created");

        Self {
            session_id,
            session: SessionStateMachine::new(),
            aliases,
            host,
            log,
            tracked: TrackedProcesses::new(),
            system_events,
            hotkeys: BTreeMap::new(),
        }
    }

    pub fn emit(&self, entry: LogEntry) {
        record(self.log.as_ref(), entry);
    }

    /// Log who is running the session and where
    pub fn announce(&self) {
        let banner = format!(
            "Session {} | Account: {} | Machine: {} | Processes: {}",
            self.session_id.short(),
            punch_util::account_label(),
            punch_util::machine_name(),
            self.host.process_count()
        );
        self.emit(LogEntry::new(EntryKind::Null, banner));
    }
}
