//! Entry points wiring the subsystems together.

use crate::signal::Signal;
use std::path::PathBuf;
use warden_counter::{CounterEvent, CounterStore, CountingMachine};
use warden_perms::{AuthorizationEngine, DelegationError, RoleStore};
use warden_types::{ChannelId, PrincipalId, Role, StoreError};

/// Result of a delegation attempt that passed `can_delegate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegationOutcome {
    /// One of the five delegation conditions failed; nothing changed.
    Rejected(DelegationError),
    /// The role was granted.
    Added,
    /// The target already held the role; nothing changed.
    AlreadyHeld,
    /// The role was revoked.
    Removed,
    /// The target did not hold the role (or it is protected); nothing
    /// changed.
    NotRemoved,
}

/// The assembled bot core: authorization engine + counting machine, sharing
/// one state directory.
pub struct Bot {
    perms: AuthorizationEngine,
    counter: CountingMachine,
}

impl Bot {
    /// Build both subsystems over `state_dir`.
    pub async fn new(state_dir: PathBuf) -> Result<Self, StoreError> {
        let roles = RoleStore::new(state_dir.clone()).await?;
        let cursor = CounterStore::new(state_dir).await?;
        Ok(Self {
            perms: AuthorizationEngine::new(roles),
            counter: CountingMachine::new(cursor),
        })
    }

    /// Ensure the configured owner holds the owner role. Idempotent.
    pub async fn bootstrap(&self, owner: PrincipalId) -> Result<(), StoreError> {
        self.perms.bootstrap(owner).await
    }

    pub fn perms(&self) -> &AuthorizationEngine {
        &self.perms
    }

    pub fn counter(&self) -> &CountingMachine {
        &self.counter
    }

    /// Gate for privileged operations. Called before any side effect; a
    /// denial carries the verbatim user-facing reason.
    pub async fn check_privileged(
        &self,
        principal: PrincipalId,
        required: Role,
    ) -> Result<(), Signal> {
        if self.perms.has_permission(principal, required).await {
            Ok(())
        } else {
            tracing::debug!("{principal} denied (requires {required})");
            Err(Signal::PermissionDenied {
                reason: format!(
                    "You do not have permission to use this command (requires `{required}`)."
                ),
            })
        }
    }

    /// Delegation entry point: `can_delegate` first, then the role edit.
    /// `grant = true` adds the role, `false` removes it.
    pub async fn delegate(
        &self,
        manager: PrincipalId,
        target: PrincipalId,
        role: Role,
        grant: bool,
    ) -> Result<DelegationOutcome, StoreError> {
        if let Err(rejection) = self.perms.can_delegate(manager, target, role).await {
            tracing::debug!("{manager} delegation of {role} to {target} rejected: {rejection}");
            return Ok(DelegationOutcome::Rejected(rejection));
        }

        let outcome = if grant {
            if self.perms.add_role(target, role).await? {
                DelegationOutcome::Added
            } else {
                DelegationOutcome::AlreadyHeld
            }
        } else if self.perms.remove_role(target, role).await? {
            DelegationOutcome::Removed
        } else {
            DelegationOutcome::NotRemoved
        };
        Ok(outcome)
    }

    /// Free-text compute entry point.
    pub async fn compute(&self, raw: &str) -> Signal {
        match warden_eval::evaluate(raw.trim()) {
            Ok(value) => Signal::EvalOk { value },
            Err(error) => {
                tracing::debug!("compute failed ({}): {}", error.kind(), error);
                Signal::EvalFailed { error }
            }
        }
    }

    /// Message-observer entry point. Automated authors never reach the
    /// counting machine.
    pub async fn observe_message(
        &self,
        channel: ChannelId,
        author_is_automated: bool,
        text: &str,
    ) -> Result<Option<Signal>, StoreError> {
        if author_is_automated {
            return Ok(None);
        }
        let event = self.counter.observe(channel, text).await?;
        Ok(event.map(|event| match event {
            CounterEvent::Success => Signal::CounterSuccess,
            CounterEvent::Mismatch { expected_previous } => {
                Signal::CounterMismatch { expected_previous }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use warden_eval::Number;

    const OWNER: PrincipalId = PrincipalId(1);
    const USER: PrincipalId = PrincipalId(2);
    const CH: ChannelId = ChannelId(7);

    async fn test_bot() -> (Bot, TempDir) {
        let tmp = TempDir::new().unwrap();
        let bot = Bot::new(tmp.path().to_path_buf()).await.unwrap();
        bot.bootstrap(OWNER).await.unwrap();
        (bot, tmp)
    }

    #[tokio::test]
    async fn privileged_gate_denies_with_a_reason() {
        let (bot, _tmp) = test_bot().await;
        assert!(bot.check_privileged(OWNER, Role::Owner).await.is_ok());

        let denial = bot.check_privileged(USER, Role::Owner).await.unwrap_err();
        let Signal::PermissionDenied { reason } = denial else {
            panic!("expected PermissionDenied");
        };
        assert!(reason.contains("owner"));
    }

    #[tokio::test]
    async fn delegation_grant_and_revoke() {
        let (bot, _tmp) = test_bot().await;

        assert_eq!(
            bot.delegate(OWNER, USER, Role::Soundpad, true).await.unwrap(),
            DelegationOutcome::Added
        );
        assert_eq!(
            bot.delegate(OWNER, USER, Role::Soundpad, true).await.unwrap(),
            DelegationOutcome::AlreadyHeld
        );
        assert!(bot.perms().has_permission(USER, Role::Soundpad).await);

        assert_eq!(
            bot.delegate(OWNER, USER, Role::Soundpad, false).await.unwrap(),
            DelegationOutcome::Removed
        );
        assert_eq!(
            bot.delegate(OWNER, USER, Role::Soundpad, false).await.unwrap(),
            DelegationOutcome::NotRemoved
        );
    }

    #[tokio::test]
    async fn delegation_rejections_pass_through() {
        let (bot, _tmp) = test_bot().await;
        assert_eq!(
            bot.delegate(USER, OWNER, Role::Soundpad, true).await.unwrap(),
            DelegationOutcome::Rejected(DelegationError::NotManager)
        );
        assert_eq!(
            bot.delegate(OWNER, USER, Role::Host, true).await.unwrap(),
            DelegationOutcome::Rejected(DelegationError::ProtectedRole(Role::Host))
        );
    }

    #[tokio::test]
    async fn compute_signals() {
        let (bot, _tmp) = test_bot().await;
        assert_eq!(
            bot.compute(" 2^10 ").await,
            Signal::EvalOk {
                value: Number::Int(1024)
            }
        );
        assert!(matches!(
            bot.compute("1/0").await,
            Signal::EvalFailed { .. }
        ));
    }

    #[tokio::test]
    async fn automated_authors_never_reach_the_counter() {
        let (bot, _tmp) = test_bot().await;
        bot.counter().configure(CH, 1).await.unwrap();

        assert_eq!(bot.observe_message(CH, true, "1").await.unwrap(), None);
        assert_eq!(
            bot.observe_message(CH, false, "1").await.unwrap(),
            Some(Signal::CounterSuccess)
        );
        assert_eq!(
            bot.observe_message(CH, false, "9").await.unwrap(),
            Some(Signal::CounterMismatch {
                expected_previous: 1
            })
        );
    }
}
