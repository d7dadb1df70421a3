//! Access rules for alias namespaces

use bitflags::bitflags;

bitflags! {
    /// Rights an account may hold on a namespace
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessRights: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const DELETE = 1 << 2;
    }
}

impl AccessRights {
    /// Everything the owner of a namespace gets
    pub fn owner() -> Self {
        Self::READ | Self::WRITE | Self::DELETE
    }
}

/// Allow rule attached to a namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pub account: String,
    pub rights: AccessRights,
}

impl AccessRule {
    pub fn allow(account: impl Into<String>, rights: AccessRights) -> Self {
        Self {
            account: account.into(),
            rights,
        }
    }

    /// Rule granting `account` read, write and delete
    pub fn owner(account: impl Into<String>) -> Self {
        Self::allow(account, AccessRights::owner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_rule_has_all_rights() {
        let rule = AccessRule::owner("alice");
        assert!(rule.rights.contains(AccessRights::READ | AccessRights::WRITE));
        assert!(rule.rights.contains(AccessRights::DELETE));
    }

    #[test]
    fn rights_survive_bits_round_trip() {
        let rights = AccessRights::READ | AccessRights::DELETE;
        assert_eq!(AccessRights::from_bits_truncate(rights.bits()), rights);
    }
}
