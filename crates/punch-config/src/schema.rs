//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Session settings
    #[serde(default)]
    pub session: RawSessionConfig,

    /// Aliases written into the alias namespace at startup
    #[serde(default)]
    pub aliases: Vec<RawAlias>,
}

/// Session-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSessionConfig {
    /// Data directory for the alias store
    pub data_dir: Option<PathBuf>,

    /// Directory the time log is written to
    pub log_dir: Option<PathBuf>,

    /// Path of the alias namespace inside the store
    pub alias_namespace: Option<String>,

    /// How OPEN matches its argument against alias names
    pub alias_match: Option<RawAliasMatch>,

    /// Whether system events (open/close/alias commands) start enabled
    pub system_events: Option<bool>,

    /// Account used for namespace access rules (default: current user)
    pub account: Option<String>,
}

/// Raw alias match policy
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RawAliasMatch {
    Contains,
    Exact,
}

/// Raw alias definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawAlias {
    pub name: String,
    pub targets: Vec<String>,
}
