//! The role vocabulary.
//!
//! Roles come in two disjoint categories:
//!
//! - *Hierarchical* roles are totally ordered by rank, rank 0 being the most
//!   powerful: host > owner > permsmanager > moderator. Holding a role
//!   satisfies any check at its own rank or below in authority.
//! - *Independent* roles (soundpad / join / leave) are standalone capability
//!   grants with no rank relationship, except that host and owner implicitly
//!   hold every independent capability.
//!
//! host, owner, and permsmanager are *protected*: they can never be granted
//! or revoked through the delegation path, only by out-of-band bootstrap.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::PrincipalId;

/// A principal's role set at a point in time.
pub type RoleSet = BTreeSet<Role>;

/// The full principal → roles relation, as loaded from the store.
/// Invariant: no key maps to an empty set (absence ≡ empty).
pub type RoleMap = BTreeMap<PrincipalId, RoleSet>;

/// A role tag. The set is closed; there is no runtime registration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    // Hierarchical, highest authority first
    Host,
    Owner,
    PermsManager,
    Moderator,
    // Independent
    Soundpad,
    Join,
    Leave,
}

/// Hierarchical roles from highest to lowest authority. Index = rank.
pub const HIERARCHY: [Role; 4] = [Role::Host, Role::Owner, Role::PermsManager, Role::Moderator];

/// Independent capability roles.
pub const INDEPENDENT: [Role; 3] = [Role::Soundpad, Role::Join, Role::Leave];

/// Roles that can never be changed through delegation.
pub const PROTECTED: [Role; 3] = [Role::Host, Role::Owner, Role::PermsManager];

impl Role {
    /// Every role, hierarchical first.
    pub const ALL: [Role; 7] = [
        Role::Host,
        Role::Owner,
        Role::PermsManager,
        Role::Moderator,
        Role::Soundpad,
        Role::Join,
        Role::Leave,
    ];

    /// Rank within the hierarchy (0 = host), or `None` for independent roles.
    pub fn rank(self) -> Option<u8> {
        HIERARCHY.iter().position(|&r| r == self).map(|i| i as u8)
    }

    pub fn is_hierarchical(self) -> bool {
        self.rank().is_some()
    }

    pub fn is_independent(self) -> bool {
        INDEPENDENT.contains(&self)
    }

    pub fn is_protected(self) -> bool {
        PROTECTED.contains(&self)
    }

    /// The stored/displayed tag for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Host => "host",
            Role::Owner => "owner",
            Role::PermsManager => "permsmanager",
            Role::Moderator => "moderator",
            Role::Soundpad => "soundpad",
            Role::Join => "join",
            Role::Leave => "leave",
        }
    }

    /// Parse a stored tag. Returns `None` for unknown tags so store loads
    /// can drop bad entries instead of failing the whole relation.
    pub fn from_tag(tag: &str) -> Option<Role> {
        match tag {
            "host" => Some(Role::Host),
            "owner" => Some(Role::Owner),
            "permsmanager" => Some(Role::PermsManager),
            "moderator" => Some(Role::Moderator),
            "soundpad" => Some(Role::Soundpad),
            "join" => Some(Role::Join),
            "leave" => Some(Role::Leave),
            _ => None,
        }
    }

    /// One-line human description, shown by the `perms` listing.
    pub fn description(self) -> &'static str {
        match self {
            Role::Host => "absolute authority, including process control",
            Role::Owner => "server owner; everything that cannot break the bot itself",
            Role::PermsManager => "may change other users' independent roles",
            Role::Moderator => "moderator",
            Role::Soundpad => "access to the soundpad",
            Role::Join => "may summon the bot into a voice channel",
            Role::Leave => "may disconnect the bot from a voice channel",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_hierarchy_order() {
        assert_eq!(Role::Host.rank(), Some(0));
        assert_eq!(Role::Owner.rank(), Some(1));
        assert_eq!(Role::PermsManager.rank(), Some(2));
        assert_eq!(Role::Moderator.rank(), Some(3));
        assert_eq!(Role::Soundpad.rank(), None);
    }

    #[test]
    fn categories_are_disjoint() {
        for role in Role::ALL {
            assert_ne!(role.is_hierarchical(), role.is_independent());
        }
    }

    #[test]
    fn protected_set_is_exactly_the_top_three() {
        assert!(Role::Host.is_protected());
        assert!(Role::Owner.is_protected());
        assert!(Role::PermsManager.is_protected());
        assert!(!Role::Moderator.is_protected());
        assert!(!Role::Soundpad.is_protected());
    }

    #[test]
    fn tag_roundtrip() {
        for role in Role::ALL {
            assert_eq!(Role::from_tag(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_tag("admin"), None);
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&Role::PermsManager).unwrap();
        assert_eq!(json, "\"permsmanager\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::PermsManager);
    }
}
