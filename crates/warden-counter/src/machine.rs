//! The counting state machine.

use crate::store::{CounterCursor, CounterStore};
use tokio::sync::Mutex;
use warden_types::{ChannelId, StoreError};

/// Absolute tolerance when comparing an evaluated message against the
/// expected value. Absorbs floating-point noise from expressions like
/// `sqrt(16)`; it is not meant to admit near-misses as valid plays.
pub const COUNTER_TOLERANCE: f64 = 0.4;

/// What an observed message did to the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterEvent {
    /// The message matched the expected value; the cursor advanced.
    Success,
    /// The message evaluated to a number but not the expected one. The
    /// cursor did not move; `expected_previous` is the last number that was
    /// correctly played.
    Mismatch { expected_previous: i64 },
}

/// Watches one channel for the next number in the sequence.
///
/// There is deliberately no per-user turn-taking and no duplicate-poster
/// rule: any author's message in the bound channel can advance the cursor.
pub struct CountingMachine {
    store: CounterStore,
    write_lock: Mutex<()>,
}

impl CountingMachine {
    pub fn new(store: CounterStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Bind the counter to `channel`, seeding the sequence at `start`.
    /// Overwrites any prior binding — there is one cursor in the system.
    pub async fn configure(&self, channel: ChannelId, start: i64) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.store
            .save(&CounterCursor {
                channel: Some(channel),
                next_expected: start,
            })
            .await
    }

    /// Disable the counter from any state. The stored `next_expected` is
    /// irrelevant while disabled.
    pub async fn disable(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut cursor = self.store.load().await;
        cursor.channel = None;
        self.store.save(&cursor).await
    }

    /// Current cursor state.
    pub async fn status(&self) -> CounterCursor {
        self.store.load().await
    }

    /// Feed one channel message through the machine.
    ///
    /// Returns `None` when the message is invisible to the counter: counter
    /// disabled, message in another channel, or text that does not evaluate
    /// to a number (evaluator failures are not penalized).
    pub async fn observe(
        &self,
        channel: ChannelId,
        text: &str,
    ) -> Result<Option<CounterEvent>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let cursor = self.store.load().await;
        let Some(bound) = cursor.channel else {
            return Ok(None);
        };
        if bound != channel {
            return Ok(None);
        }

        let value = match warden_eval::evaluate(text.trim()) {
            Ok(value) => value.as_f64(),
            Err(_) => return Ok(None),
        };

        let expected = cursor.next_expected as f64;
        if (value - expected).abs() <= COUNTER_TOLERANCE {
            self.store
                .save(&CounterCursor {
                    channel: Some(bound),
                    next_expected: cursor.next_expected + 1,
                })
                .await?;
            Ok(Some(CounterEvent::Success))
        } else {
            Ok(Some(CounterEvent::Mismatch {
                expected_previous: cursor.next_expected - 1,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CH: ChannelId = ChannelId(7);
    const OTHER: ChannelId = ChannelId(8);

    async fn test_machine() -> (CountingMachine, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = CounterStore::new(tmp.path().to_path_buf()).await.unwrap();
        (CountingMachine::new(store), tmp)
    }

    #[tokio::test]
    async fn disabled_machine_ignores_everything() {
        let (machine, _tmp) = test_machine().await;
        assert_eq!(machine.observe(CH, "1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn correct_play_advances_the_cursor() {
        let (machine, _tmp) = test_machine().await;
        machine.configure(CH, 1).await.unwrap();

        assert_eq!(
            machine.observe(CH, "1").await.unwrap(),
            Some(CounterEvent::Success)
        );
        assert_eq!(machine.status().await.next_expected, 2);
    }

    #[tokio::test]
    async fn mismatch_reports_previous_and_does_not_advance() {
        let (machine, _tmp) = test_machine().await;
        machine.configure(CH, 1).await.unwrap();
        machine.observe(CH, "1").await.unwrap();

        assert_eq!(
            machine.observe(CH, "5").await.unwrap(),
            Some(CounterEvent::Mismatch {
                expected_previous: 1
            })
        );
        // cursor unchanged; a retry with the right number still works
        assert_eq!(machine.status().await.next_expected, 2);
        assert_eq!(
            machine.observe(CH, "2").await.unwrap(),
            Some(CounterEvent::Success)
        );
    }

    #[tokio::test]
    async fn other_channels_are_invisible() {
        let (machine, _tmp) = test_machine().await;
        machine.configure(CH, 1).await.unwrap();
        machine.observe(CH, "1").await.unwrap();

        assert_eq!(machine.observe(OTHER, "2").await.unwrap(), None);
        assert_eq!(machine.status().await.next_expected, 2);
    }

    #[tokio::test]
    async fn non_numeric_messages_are_not_plays() {
        let (machine, _tmp) = test_machine().await;
        machine.configure(CH, 1).await.unwrap();

        for text in ["hello", "", "   ", "1 +", "secret('x')", "unknown_name"] {
            assert_eq!(machine.observe(CH, text).await.unwrap(), None, "{text:?}");
        }
        assert_eq!(machine.status().await.next_expected, 1);
    }

    #[tokio::test]
    async fn expressions_count_as_plays() {
        let (machine, _tmp) = test_machine().await;
        machine.configure(CH, 1).await.unwrap();

        assert_eq!(
            machine.observe(CH, "sqrt(1)").await.unwrap(),
            Some(CounterEvent::Success)
        );
        assert_eq!(
            machine.observe(CH, "1 + 1").await.unwrap(),
            Some(CounterEvent::Success)
        );
        assert_eq!(
            machine.observe(CH, "2^2 - 1").await.unwrap(),
            Some(CounterEvent::Success)
        );
        assert_eq!(machine.status().await.next_expected, 4);
    }

    #[tokio::test]
    async fn tolerance_absorbs_float_noise_only() {
        let (machine, _tmp) = test_machine().await;
        machine.configure(CH, 2).await.unwrap();

        // 2.3 is within 0.4 of 2 — a play; 2.5 is not
        assert_eq!(
            machine.observe(CH, "2.3").await.unwrap(),
            Some(CounterEvent::Success)
        );
        assert_eq!(
            machine.observe(CH, "3.5").await.unwrap(),
            Some(CounterEvent::Mismatch {
                expected_previous: 2
            })
        );
    }

    #[tokio::test]
    async fn configure_overwrites_and_disable_stops() {
        let (machine, _tmp) = test_machine().await;
        machine.configure(CH, 1).await.unwrap();
        machine.observe(CH, "1").await.unwrap();

        machine.configure(OTHER, 10).await.unwrap();
        let status = machine.status().await;
        assert_eq!(status.channel, Some(OTHER));
        assert_eq!(status.next_expected, 10);

        machine.disable().await.unwrap();
        assert_eq!(machine.status().await.channel, None);
        assert_eq!(machine.observe(OTHER, "10").await.unwrap(), None);
    }
}
