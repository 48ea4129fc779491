//! The Warden bot core: inbound entry points and outbound signals.
//!
//! Everything platform-specific (command registration, message formatting,
//! voice I/O) lives outside this crate; what remains is the contract the
//! presentation layer drives — permission-gated operations, delegation,
//! expression computation, and the counting-channel observer.

pub mod dice;
pub mod router;
pub mod signal;

pub use router::{Bot, DelegationOutcome};
pub use signal::Signal;
