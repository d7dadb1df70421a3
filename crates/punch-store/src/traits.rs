//! Store trait definitions

use punch_api::LogEntry;
use std::path::{Path, PathBuf};

use crate::{AccessRights, AccessRule, StoreError, StoreResult};

/// An opened alias namespace and the rights it was opened with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceHandle {
    pub path: String,
    pub account: String,
    pub granted: AccessRights,
}

impl NamespaceHandle {
    pub fn can(&self, rights: AccessRights) -> bool {
        self.granted.contains(rights)
    }
}

/// Namespaced key-value store holding alias entries
pub trait AliasNamespaceStore: Send + Sync {
    /// Open an existing namespace for `account` with the requested rights.
    ///
    /// Fails with `NotFound` when the namespace does not exist and with
    /// `AccessDenied` when the account's rule lacks any requested right.
    fn open(
        &self,
        path: &str,
        account: &str,
        rights: AccessRights,
    ) -> StoreResult<NamespaceHandle>;

    /// Create a namespace carrying a single allow rule.
    ///
    /// Returns `None` when the namespace already exists (its rules are left untouched).
    fn create(&self, path: &str, rule: &AccessRule) -> StoreResult<Option<NamespaceHandle>>;

    /// Write or overwrite a value; an overwrite keeps the entry's position
    fn set_value(&self, ns: &NamespaceHandle, name: &str, value: &str) -> StoreResult<()>;

    /// Value names in insertion order
    fn value_names(&self, ns: &NamespaceHandle) -> StoreResult<Vec<String>>;

    /// Value stored under `name`
    fn get_value(&self, ns: &NamespaceHandle, name: &str) -> StoreResult<Option<String>>;

    /// Release a handle
    fn close(&self, ns: NamespaceHandle) {
        drop(ns);
    }

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}

/// Append-only sink for session time log entries
pub trait TimeLog: Send + Sync {
    /// Append one entry
    fn append(&self, entry: &LogEntry) -> StoreResult<()>;

    /// Point the log at another directory; returns the new file path
    fn retarget(&self, dir: &Path) -> StoreResult<PathBuf> {
        Err(StoreError::Unsupported(format!(
            "cannot retarget log to {}",
            dir.display()
        )))
    }

    /// File currently written to, if any
    fn target(&self) -> Option<PathBuf> {
        None
    }
}
