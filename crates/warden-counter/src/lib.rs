//! Sequential counting channel for Warden.
//!
//! One persisted cursor watches one text channel for a strictly incrementing
//! numeric sequence. Each message in the bound channel is run through the
//! sandboxed evaluator; a result matching the expected value (within a fixed
//! tolerance) advances the cursor by one. Anything that does not evaluate is
//! simply not a play and is ignored.

pub mod machine;
pub mod store;

pub use machine::{COUNTER_TOLERANCE, CounterEvent, CountingMachine};
pub use store::{CounterCursor, CounterStore};
