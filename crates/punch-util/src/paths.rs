//! Default paths for punchclock components
//!
//! Paths are user-writable by default (no root required):
//! - Config: `$XDG_CONFIG_HOME/punchclock/config.toml` or `~/.config/punchclock/config.toml`
//! - Data: `$XDG_DATA_HOME/punchclock` or `~/.local/share/punchclock`
//! - Logs: `$XDG_STATE_HOME/punchclock` or `~/.local/state/punchclock`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const PUNCHCLOCK_CONFIG_ENV: &str = "PUNCHCLOCK_CONFIG";

/// Environment variable for overriding the data directory
pub const PUNCHCLOCK_DATA_DIR_ENV: &str = "PUNCHCLOCK_DATA_DIR";

/// Application subdirectory name
const APP_DIR: &str = "punchclock";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/punchclock/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/punchclock/config.toml` (fallback)
///
/// `PUNCHCLOCK_CONFIG` is handled by the CLI layer so it shows up in `--help`.
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$PUNCHCLOCK_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/punchclock` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/punchclock` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(PUNCHCLOCK_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// XDG data directory, ignoring PUNCHCLOCK_DATA_DIR
fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Get the default log directory for time log files.
///
/// Order of precedence:
/// 1. `$XDG_STATE_HOME/punchclock` (if XDG_STATE_HOME is set)
/// 2. `~/.local/state/punchclock` (fallback)
pub fn default_log_dir() -> PathBuf {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(state_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("state")
            .join(APP_DIR);
    }

    PathBuf::from("/tmp").join(APP_DIR).join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_contains_punchclock() {
        let path = default_config_path();
        assert!(path.to_string_lossy().contains("punchclock"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn data_dir_contains_punchclock() {
        let path = data_dir_without_env();
        assert!(path.to_string_lossy().contains("punchclock"));
    }

    #[test]
    fn log_dir_contains_punchclock() {
        let path = default_log_dir();
        assert!(path.to_string_lossy().contains("punchclock"));
    }
}
