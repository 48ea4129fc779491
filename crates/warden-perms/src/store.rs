//! Durable role storage backed by a JSON file.

use std::collections::BTreeMap;
use std::path::PathBuf;
use warden_types::{PrincipalId, Role, RoleMap, StoreError};

/// File-based role store. The whole relation lives in one `roles.json`:
/// an object keyed by decimal principal id, each value a sorted array of
/// role tags. Principals with no roles are never written.
pub struct RoleStore {
    path: PathBuf,
}

impl RoleStore {
    /// Create a store rooted at `state_dir`, ensuring the directory exists.
    pub async fn new(state_dir: PathBuf) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(&state_dir).await?;
        Ok(Self {
            path: state_dir.join("roles.json"),
        })
    }

    /// Load the full relation.
    ///
    /// Fails closed: a missing file is the empty relation, and unreadable or
    /// corrupt content also degrades to empty rather than erroring. Unknown
    /// role tags are dropped per entry; an unparseable principal key voids
    /// the whole load (the file did not come from us).
    pub async fn load(&self) -> RoleMap {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return RoleMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                return RoleMap::new();
            }
        };

        let raw: BTreeMap<String, Vec<String>> = match serde_json::from_str(&data) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", self.path.display(), e);
                return RoleMap::new();
            }
        };

        let mut map = RoleMap::new();
        for (key, tags) in raw {
            let Ok(id) = key.parse::<u64>() else {
                tracing::warn!("Bad principal key '{}' in {}", key, self.path.display());
                return RoleMap::new();
            };
            let roles: warden_types::RoleSet =
                tags.iter().filter_map(|t| Role::from_tag(t)).collect();
            if !roles.is_empty() {
                map.insert(PrincipalId(id), roles);
            }
        }
        map
    }

    /// Save the full relation (atomic write: .tmp → rename).
    /// Empty role sets are skipped so absence stays equivalent to empty.
    pub async fn save(&self, map: &RoleMap) -> Result<(), StoreError> {
        let raw: BTreeMap<String, Vec<&str>> = map
            .iter()
            .filter(|(_, roles)| !roles.is_empty())
            .map(|(id, roles)| {
                (
                    id.to_string(),
                    roles.iter().map(|r| r.as_str()).collect(),
                )
            })
            .collect();

        let json = serde_json::to_string_pretty(&raw)?;
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}
