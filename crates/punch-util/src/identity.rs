//! Identity and environment queries
//!
//! These feed the startup banner and the default account granted on a
//! freshly created alias namespace. Identity comes from the effective uid,
//! not from environment variables.

use nix::unistd::{gethostname, geteuid, User};
use tracing::debug;

/// Name of the account running this process
pub fn current_account() -> String {
    let uid = geteuid();
    match User::from_uid(uid) {
        Ok(Some(user)) => user.name,
        Ok(None) => uid.as_raw().to_string(),
        Err(e) => {
            debug!(uid = uid.as_raw(), error = %e, "Failed to look up account");
            uid.as_raw().to_string()
        }
    }
}

/// Whether the process runs with an elevated account
pub fn is_admin() -> bool {
    geteuid().is_root()
}

/// Account name decorated with its role, e.g. `alice (User)`
pub fn account_label() -> String {
    let role = if is_admin() { "Admin" } else { "User" };
    format!("{} ({})", current_account(), role)
}

/// Host name of this machine
pub fn machine_name() -> String {
    gethostname()
        .map(|name| name.to_string_lossy().into_owned())
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}
