//! Authorization engine — the decision logic on top of the role store.

use crate::error::DelegationError;
use crate::store::RoleStore;
use tokio::sync::Mutex;
use warden_types::{PrincipalId, Role, RoleSet, StoreError};

/// Makes every permission and delegation decision.
///
/// The engine is the sole writer of the role store. Checks re-read the store
/// each time; mutations hold `write_lock` across the whole read-modify-write
/// so two concurrent role edits cannot lose an update.
pub struct AuthorizationEngine {
    store: RoleStore,
    write_lock: Mutex<()>,
}

/// Minimal rank among a set's hierarchical roles, `None` if it has none.
fn hierarchy_level_of(roles: &RoleSet) -> Option<u8> {
    roles.iter().filter_map(|r| r.rank()).min()
}

impl AuthorizationEngine {
    pub fn new(store: RoleStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Does `principal` satisfy a check for `required`?
    ///
    /// Hierarchical roles are satisfied by any held role of equal or higher
    /// authority. Independent roles are satisfied by holding the role itself,
    /// or by holding host or owner — those two implicitly grant every
    /// independent capability. Unknown principals satisfy nothing.
    pub async fn has_permission(&self, principal: PrincipalId, required: Role) -> bool {
        let map = self.store.load().await;
        let Some(roles) = map.get(&principal) else {
            return false;
        };

        match required.rank() {
            Some(required_rank) => {
                hierarchy_level_of(roles).is_some_and(|level| level <= required_rank)
            }
            None => {
                roles.contains(&required)
                    || roles.contains(&Role::Host)
                    || roles.contains(&Role::Owner)
            }
        }
    }

    /// The principal's hierarchy rank (0 = host), or `None` if it holds no
    /// hierarchical role. `None` ranks below every real rank.
    pub async fn hierarchy_level(&self, principal: PrincipalId) -> Option<u8> {
        let map = self.store.load().await;
        map.get(&principal).and_then(hierarchy_level_of)
    }

    /// May `manager` change `role` for `target`?
    ///
    /// All five conditions must hold; the first failing one is returned and
    /// its `Display` text is surfaced to the user verbatim:
    ///
    /// 1. `role` is not protected — protected roles are immutable through
    ///    delegation, even for host.
    /// 2. `manager` ranks at permsmanager or above.
    /// 3. `manager` is not `target` — no self-modification, at any rank.
    /// 4. `role` is independent — hierarchy is never grantable here.
    /// 5. `manager` ranks at owner or above. Permsmanager rank passes the
    ///    check in (2) but cannot execute a grant; the asymmetry is
    ///    intentional.
    pub async fn can_delegate(
        &self,
        manager: PrincipalId,
        target: PrincipalId,
        role: Role,
    ) -> Result<(), DelegationError> {
        if role.is_protected() {
            return Err(DelegationError::ProtectedRole(role));
        }
        if !self.has_permission(manager, Role::PermsManager).await {
            return Err(DelegationError::NotManager);
        }
        if manager == target {
            return Err(DelegationError::SelfDelegation);
        }
        if !role.is_independent() {
            return Err(DelegationError::IndependentOnly);
        }
        let owner_rank = Role::Owner.rank().unwrap_or(u8::MAX);
        if !self
            .hierarchy_level(manager)
            .await
            .is_some_and(|level| level <= owner_rank)
        {
            return Err(DelegationError::OwnersOnly);
        }
        Ok(())
    }

    /// Add a role. Returns `true` if newly added, `false` if already held.
    pub async fn add_role(&self, principal: PrincipalId, role: Role) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.store.load().await;
        let roles = map.entry(principal).or_default();
        if !roles.insert(role) {
            return Ok(false);
        }
        self.store.save(&map).await?;
        Ok(true)
    }

    /// Remove a role. Returns `false` if absent — or if the role is
    /// protected, which can never be removed here regardless of caller.
    pub async fn remove_role(
        &self,
        principal: PrincipalId,
        role: Role,
    ) -> Result<bool, StoreError> {
        if role.is_protected() {
            return Ok(false);
        }
        let _guard = self.write_lock.lock().await;
        let mut map = self.store.load().await;
        let Some(roles) = map.get_mut(&principal) else {
            return Ok(false);
        };
        if !roles.remove(&role) {
            return Ok(false);
        }
        if roles.is_empty() {
            map.remove(&principal);
        }
        self.store.save(&map).await?;
        Ok(true)
    }

    /// Ensure `owner` holds the owner role. Idempotent; called once at
    /// process start.
    pub async fn bootstrap(&self, owner: PrincipalId) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.store.load().await;
        let roles = map.entry(owner).or_default();
        if roles.contains(&Role::Owner) {
            return Ok(());
        }
        roles.insert(Role::Owner);
        self.store.save(&map).await
    }

    /// All roles held by `principal`.
    pub async fn roles_of(&self, principal: PrincipalId) -> RoleSet {
        let map = self.store.load().await;
        map.get(&principal).cloned().unwrap_or_default()
    }

    /// Replace `principal`'s whole role set. An empty set deletes the record.
    pub async fn set_roles(
        &self,
        principal: PrincipalId,
        roles: RoleSet,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.store.load().await;
        if roles.is_empty() {
            map.remove(&principal);
        } else {
            map.insert(principal, roles);
        }
        self.store.save(&map).await
    }

    /// Every principal currently holding `role`.
    pub async fn principals_with(&self, role: Role) -> Vec<PrincipalId> {
        let map = self.store.load().await;
        map.iter()
            .filter(|(_, roles)| roles.contains(&role))
            .map(|(id, _)| *id)
            .collect()
    }
}
