//! Time log entry types

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a time log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    PunchIn,
    PunchOut,
    Post,
    ProcessStartRequest,
    SystemPost,
    SystemError,
    /// Informational entry with no particular meaning
    Null,
}

impl EntryKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::PunchIn => "PUNCHIN",
            EntryKind::PunchOut => "PUNCHOUT",
            EntryKind::Post => "POST",
            EntryKind::ProcessStartRequest => "PROCESS_START_REQUEST",
            EntryKind::SystemPost => "SYSTEM_POST",
            EntryKind::SystemError => "SYSTEM_ERROR",
            EntryKind::Null => "NULL",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Color the terminal should render an entry with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayHint {
    Green,
    Yellow,
    Red,
}

/// One record of the session time log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub kind: EntryKind,
    pub message: Option<String>,
    pub hint: Option<DisplayHint>,
}

impl LogEntry {
    pub fn new(kind: EntryKind, message: impl Into<String>) -> Self {
        Self {
            timestamp: punch_util::now(),
            kind,
            message: Some(message.into()),
            hint: None,
        }
    }

    /// Entry without a message, e.g. a bare punch-in mark
    pub fn bare(kind: EntryKind) -> Self {
        Self {
            timestamp: punch_util::now(),
            kind,
            message: None,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: DisplayHint) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn at(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Plain text line as written to the time log file
    pub fn to_line(&self) -> String {
        let ts = punch_util::format_datetime_full(&self.timestamp);
        match &self.message {
            Some(message) => format!("[{}] {:<8} {}", ts, self.kind.label(), message),
            None => format!("[{}] {}", ts, self.kind.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn line_format() {
        let ts = Local.with_ymd_and_hms(2025, 12, 25, 9, 0, 0).unwrap();
        let entry = LogEntry::new(EntryKind::Post, "standup").at(ts);
        assert_eq!(entry.to_line(), "[2025-12-25 09:00:00] POST     standup");

        let bare = LogEntry::bare(EntryKind::PunchIn).at(ts);
        assert_eq!(bare.to_line(), "[2025-12-25 09:00:00] PUNCHIN");
    }

    #[test]
    fn kind_serializes_screaming() {
        let json = serde_json::to_string(&EntryKind::SystemError).unwrap();
        assert_eq!(json, "\"SYSTEM_ERROR\"");
    }
}
