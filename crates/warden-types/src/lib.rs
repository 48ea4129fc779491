//! Shared types and error hierarchy for Warden.

pub mod error;
pub mod ids;
pub mod role;

pub use error::{ConfigError, StoreError};
pub use ids::{ChannelId, PrincipalId};
pub use role::{Role, RoleMap, RoleSet};
