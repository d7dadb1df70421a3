//! Validated settings structures

use crate::schema::{RawAlias, RawAliasMatch, RawConfig, RawSessionConfig};
use punch_api::MULTI_TARGET_DELIMITER;
use std::path::PathBuf;

/// Default path of the alias namespace
pub const DEFAULT_ALIAS_NAMESPACE: &str = "Software/Punchclock/Alias";

/// Validated settings ready for use by the session core
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub session: SessionSettings,
    pub aliases: Vec<AliasSeed>,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            session: SessionSettings::from_raw(raw.session),
            aliases: raw.aliases.into_iter().map(AliasSeed::from_raw).collect(),
        }
    }
}

/// How an alias lookup compares the requested name with stored names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasMatch {
    /// First stored name containing the requested name
    #[default]
    Contains,
    /// Stored name equal to the requested name
    Exact,
}

impl AliasMatch {
    pub fn matches(&self, stored: &str, requested: &str) -> bool {
        match self {
            AliasMatch::Contains => stored.contains(requested),
            AliasMatch::Exact => stored == requested,
        }
    }
}

impl From<RawAliasMatch> for AliasMatch {
    fn from(raw: RawAliasMatch) -> Self {
        match raw {
            RawAliasMatch::Contains => AliasMatch::Contains,
            RawAliasMatch::Exact => AliasMatch::Exact,
        }
    }
}

/// Session settings
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub alias_namespace: String,
    pub alias_match: AliasMatch,
    pub system_events: bool,
    pub account: String,
}

impl SessionSettings {
    fn from_raw(raw: RawSessionConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(punch_util::default_data_dir),
            log_dir: raw.log_dir.unwrap_or_else(punch_util::default_log_dir),
            alias_namespace: raw
                .alias_namespace
                .unwrap_or_else(|| DEFAULT_ALIAS_NAMESPACE.to_string()),
            alias_match: raw.alias_match.map(Into::into).unwrap_or_default(),
            system_events: raw.system_events.unwrap_or(false),
            account: raw.account.unwrap_or_else(punch_util::current_account),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_raw(RawSessionConfig::default())
    }
}

/// Alias written into the namespace at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSeed {
    pub name: String,
    pub targets: Vec<String>,
}

impl AliasSeed {
    fn from_raw(raw: RawAlias) -> Self {
        Self {
            name: raw.name.trim().to_string(),
            targets: raw.targets.into_iter().map(|t| t.trim().to_string()).collect(),
        }
    }

    /// Stored value: targets joined by the multi-target delimiter
    pub fn value(&self) -> String {
        self.targets.join(&MULTI_TARGET_DELIMITER.to_string())
    }
}
