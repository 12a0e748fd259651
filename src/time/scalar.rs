//! Lamport (scalar) clock.
//!
//! If event `a` happened before event `b`, then `ts(a) < ts(b)`. The converse
//! does not hold: two equal timestamps only mean this clock cannot decide how
//! the events relate. They are never evidence of concurrency.

use super::LogicalClock;
use crate::error::ClockError;

/// A single monotonically increasing counter. Saturates at `u64::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScalarClock {
    counter: u64,
}

impl ScalarClock {
    /// Creates a clock at zero.
    pub const fn new() -> Self {
        ScalarClock { counter: 0 }
    }

    /// Records a local event and returns the new timestamp.
    pub fn local_event(&mut self) -> u64 {
        self.counter = self.counter.saturating_add(1);
        self.counter
    }

    /// Records a send. The returned timestamp travels with the message.
    pub fn send_event(&mut self) -> u64 {
        self.local_event()
    }

    /// Merges a received timestamp: `max(local, received) + 1`.
    pub fn receive_event(&mut self, received: u64) -> u64 {
        self.counter = self.counter.max(received).saturating_add(1);
        self.counter
    }

    pub fn current_value(&self) -> u64 {
        self.counter
    }
}

impl LogicalClock for ScalarClock {
    type Value = u64;

    fn local_event(&mut self) -> u64 {
        ScalarClock::local_event(self)
    }

    fn receive_event(&mut self, received: &u64) -> Result<u64, ClockError> {
        Ok(ScalarClock::receive_event(self, *received))
    }

    fn current_value(&self) -> u64 {
        ScalarClock::current_value(self)
    }
}
