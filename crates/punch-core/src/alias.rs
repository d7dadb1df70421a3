//! Alias resolution and multi-target launching

use punch_api::{DisplayHint, EntryKind, LogEntry, MULTI_TARGET_DELIMITER};
use punch_config::{AliasMatch, AliasSeed};
use punch_host_api::ProcessControl;
use punch_store::{AccessRights, AccessRule, AliasNamespaceStore, StoreError, TimeLog};
use punch_util::Moment;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{record, TrackedProcesses};

/// Alias write failures, each reported to the user as one log entry
#[derive(Debug, Error)]
pub enum AliasError {
    #[error("Access denied for account {account} on {namespace}")]
    AccessDenied { account: String, namespace: String },

    #[error("Alias namespace {0} does not exist")]
    NamespaceMissing(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AliasError {
    /// Short code shown after "REASON CODE:"
    pub fn reason_code(&self) -> &'static str {
        match self {
            AliasError::AccessDenied { .. } => "ACCESS_DENIED",
            AliasError::NamespaceMissing(_) => "NAMESPACE_MISSING",
            AliasError::Store(_) => "STORE_FAILURE",
        }
    }
}

pub type AliasResult<T> = Result<T, AliasError>;

/// Result of `ensure_namespace`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceOutcome {
    Created,
    AlreadyExists,
}

/// Outcome of one `resolve_and_launch` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchReport {
    /// Alias value the input resolved to, if any
    pub resolved: Option<String>,
    pub started: Vec<String>,
    pub failed: Vec<String>,
}

/// Alias namespace service bound to one account
pub struct AliasStore {
    store: Arc<dyn AliasNamespaceStore>,
    namespace: String,
    account: String,
    policy: AliasMatch,
}

impl AliasStore {
    pub fn new(
        store: Arc<dyn AliasNamespaceStore>,
        namespace: impl Into<String>,
        account: impl Into<String>,
        policy: AliasMatch,
    ) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            account: account.into(),
            policy,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Value of the first stored alias matching `name`.
    ///
    /// Names are compared in insertion order. A missing or unreadable
    /// namespace resolves nothing.
    pub fn resolve(&self, name: &str) -> Option<String> {
        let ns = match self.store.open(&self.namespace, &self.account, AccessRights::READ) {
            Ok(ns) => ns,
            Err(StoreError::NotFound(_)) => return None,
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "Alias namespace unreadable");
                return None;
            }
        };

        let result = self.lookup(&ns, name);
        self.store.close(ns);

        match result {
            Ok(value) => value,
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "Alias lookup failed");
                None
            }
        }
    }

    fn lookup(
        &self,
        ns: &punch_store::NamespaceHandle,
        name: &str,
    ) -> Result<Option<String>, StoreError> {
        let names = self.store.value_names(ns)?;
        let Some(stored) = names.iter().find(|stored| self.policy.matches(stored, name)) else {
            debug!(name, "No alias matched");
            return Ok(None);
        };
        debug!(name, stored = %stored, "Alias matched");
        self.store.get_value(ns, stored)
    }

    /// Write `name = value` into the namespace
    pub fn put(&self, name: &str, value: &str) -> AliasResult<()> {
        let ns = self
            .store
            .open(&self.namespace, &self.account, AccessRights::WRITE)
            .map_err(|e| match e {
                StoreError::NotFound(_) => AliasError::NamespaceMissing(self.namespace.clone()),
                StoreError::AccessDenied { .. } => AliasError::AccessDenied {
                    account: self.account.clone(),
                    namespace: self.namespace.clone(),
                },
                other => AliasError::Store(other),
            })?;

        let result = self.store.set_value(&ns, name, value);
        self.store.close(ns);
        result?;

        info!(name, namespace = %self.namespace, "Alias written");
        Ok(())
    }

    /// Create the namespace if missing, owned by the current account
    pub fn ensure_namespace(&self) -> AliasResult<NamespaceOutcome> {
        let rule = AccessRule::owner(&self.account);
        match self.store.create(&self.namespace, &rule)? {
            Some(ns) => {
                self.store.close(ns);
                info!(namespace = %self.namespace, account = %self.account, "Alias namespace created");
                Ok(NamespaceOutcome::Created)
            }
            None => Ok(NamespaceOutcome::AlreadyExists),
        }
    }

    /// Write configured aliases. Skipped entirely when the namespace does not exist yet.
    pub fn seed(&self, seeds: &[AliasSeed]) -> AliasResult<usize> {
        let mut written = 0;
        for seed in seeds {
            match self.put(&seed.name, &seed.value()) {
                Ok(()) => written += 1,
                Err(AliasError::NamespaceMissing(ns)) => {
                    debug!(namespace = %ns, "Skipping alias seeds, namespace missing");
                    return Ok(0);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(written)
    }

    /// Resolve `input` and launch every target of the result.
    ///
    /// Without a matching alias the raw input is launched as-is. Each
    /// target is launched independently: a failure is logged and the
    /// remaining targets still run.
    pub fn resolve_and_launch(
        &self,
        input: &str,
        host: &dyn ProcessControl,
        tracked: &mut TrackedProcesses,
        log: &dyn TimeLog,
        now: Moment,
    ) -> LaunchReport {
        let resolved = self.resolve(input);
        let value = resolved.clone().unwrap_or_else(|| input.to_string());

        let mut report = LaunchReport {
            resolved,
            ..Default::default()
        };

        for target in value
            .split(MULTI_TARGET_DELIMITER)
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            match host.start(target) {
                Ok(handle) => {
                    debug!(target, name = %handle.name, "Launched target");
                    if let Err(e) = tracked.refresh(host) {
                        warn!(error = %e, "Failed to refresh process snapshot");
                    }
                    record(
                        log,
                        LogEntry::new(
                            EntryKind::SystemPost,
                            format!("Process {} started successfully!", target),
                        )
                        .with_hint(DisplayHint::Yellow)
                        .at(now.wall),
                    );
                    report.started.push(target.to_string());
                }
                Err(e) => {
                    warn!(target, error = %e, "Launch failed");
                    record(
                        log,
                        LogEntry::new(
                            EntryKind::SystemError,
                            format!("Failed to execute process {}... REASON: {}", target, e),
                        )
                        .with_hint(DisplayHint::Red)
                        .at(now.wall),
                    );
                    report.failed.push(target.to_string());
                }
            }
        }

        report
    }
}
