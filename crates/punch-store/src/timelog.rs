//! Plain-text time log sinks

use chrono::{DateTime, Local};
use punch_api::LogEntry;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::{StoreError, StoreResult, TimeLog};

/// Appends one text line per entry to `timelog-YYYY-MM-DD.log` in a directory
pub struct FileTimeLog {
    path: Mutex<PathBuf>,
    file_name: String,
}

impl FileTimeLog {
    /// Log into `dir`, naming the file after the session's start date
    pub fn new(dir: impl AsRef<Path>, started: DateTime<Local>) -> StoreResult<Self> {
        let file_name = format!("timelog-{}.log", started.format("%Y-%m-%d"));
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let path = dir.join(&file_name);
        debug!(path = %path.display(), "Time log opened");
        Ok(Self {
            path: Mutex::new(path),
            file_name,
        })
    }

    fn current(&self) -> StoreResult<PathBuf> {
        self.path
            .lock()
            .map(|p| p.clone())
            .map_err(|_| StoreError::Database("time log lock poisoned".into()))
    }
}

impl TimeLog for FileTimeLog {
    fn append(&self, entry: &LogEntry) -> StoreResult<()> {
        let path = self.current()?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{}", entry.to_line())?;
        Ok(())
    }

    fn retarget(&self, dir: &Path) -> StoreResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let new_path = dir.join(&self.file_name);

        let mut path = self
            .path
            .lock()
            .map_err(|_| StoreError::Database("time log lock poisoned".into()))?;
        info!(from = %path.display(), to = %new_path.display(), "Time log retargeted");
        *path = new_path.clone();
        Ok(new_path)
    }

    fn target(&self) -> Option<PathBuf> {
        self.current().ok()
    }
}

/// Keeps entries in memory (for testing)
#[derive(Default)]
pub struct MemoryTimeLog {
    entries: Mutex<Vec<LogEntry>>,
    target: Mutex<Option<PathBuf>>,
}

impl MemoryTimeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Messages of all entries, empty string for bare entries
    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|e| e.message.unwrap_or_default())
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl TimeLog for MemoryTimeLog {
    fn append(&self, entry: &LogEntry) -> StoreResult<()> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Database("time log lock poisoned".into()))?
            .push(entry.clone());
        Ok(())
    }

    fn retarget(&self, dir: &Path) -> StoreResult<PathBuf> {
        let path = dir.join("timelog.log");
        if let Ok(mut target) = self.target.lock() {
            *target = Some(path.clone());
        }
        Ok(path)
    }

    fn target(&self) -> Option<PathBuf> {
        self.target.lock().ok().and_then(|t| t.clone())
    }
}
