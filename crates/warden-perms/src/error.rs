//! Delegation rejection reasons.

use thiserror::Error;
use warden_types::Role;

/// Why a delegation attempt was rejected.
///
/// One variant per `can_delegate` condition. The `Display` text is the
/// user-facing reason and is surfaced verbatim by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelegationError {
    #[error("Role `{0}` is protected and cannot be changed.")]
    ProtectedRole(Role),

    #[error("You do not have permission to manage roles. Requires `permsmanager` or higher.")]
    NotManager,

    #[error("You cannot change your own roles.")]
    SelfDelegation,

    #[error("Only these roles can be changed: soundpad, join, leave.")]
    IndependentOnly,

    #[error("Only owners and above can manage these roles.")]
    OwnersOnly,
}
