//! Role persistence and authorization decisions for Warden.
//!
//! `RoleStore` owns the durable principal → roles relation; the
//! `AuthorizationEngine` makes every permission and delegation decision on
//! top of it. The store is re-read for each decision — permissions revoked
//! by a concurrent operation take effect on the very next check.

pub mod engine;
pub mod error;
pub mod store;

pub use engine::AuthorizationEngine;
pub use error::DelegationError;
pub use store::RoleStore;
