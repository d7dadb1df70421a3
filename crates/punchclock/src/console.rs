//! Terminal echo of the time log

use colored::{ColoredString, Colorize};
use punch_api::{DisplayHint, LogEntry};
use punch_store::{StoreResult, TimeLog};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Prints every entry to the terminal, then forwards it to the file log
pub struct ConsoleTimeLog {
    inner: Arc<dyn TimeLog>,
}

impl ConsoleTimeLog {
    pub fn new(inner: Arc<dyn TimeLog>) -> Self {
        Self { inner }
    }
}

fn paint(line: String, hint: Option<DisplayHint>) -> ColoredString {
    match hint {
        Some(DisplayHint::Green) => line.green(),
        Some(DisplayHint::Yellow) => line.yellow(),
        Some(DisplayHint::Red) => line.red(),
        None => line.normal(),
    }
}

impl TimeLog for ConsoleTimeLog {
    fn append(&self, entry: &LogEntry) -> StoreResult<()> {
        println!("{}", paint(entry.to_line(), entry.hint));
        self.inner.append(entry)
    }

    fn retarget(&self, dir: &Path) -> StoreResult<PathBuf> {
        self.inner.retarget(dir)
    }

    fn target(&self) -> Option<PathBuf> {
        self.inner.target()
    }
}
