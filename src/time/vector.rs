//! Vector clock and the vector comparator.
//!
//! Unlike the scalar clock, vector snapshots characterise causality exactly:
//! `compare(v(a), v(b)) == Before` holds if and only if `a` happened before `b`.
//! The price is O(n) space per message and O(n) time per merge and comparison,
//! where n is the number of participants.

use super::LogicalClock;
use crate::error::ClockError;

/// Causal relationship between two vector snapshots.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
pub enum CausalOrder {
    /// The first snapshot happened before the second.
    Before,
    /// The second snapshot happened before the first.
    After,
    /// Neither dominates the other. Identical snapshots also land here.
    Concurrent,
}

impl CausalOrder {
    /// The same relationship seen from the other side.
    pub fn reverse(self) -> Self {
        match self {
            CausalOrder::Before => CausalOrder::After,
            CausalOrder::After => CausalOrder::Before,
            CausalOrder::Concurrent => CausalOrder::Concurrent,
        }
    }
}

/// Classifies the causal relationship of `v1` relative to `v2`.
///
/// Identical vectors classify as [`CausalOrder::Concurrent`], not as a separate
/// "equal" outcome. A caller that needs to tell "the same event" apart from two
/// independent events with coincidentally equal vectors must compare the
/// vectors for equality before calling this.
///
/// # Errors
/// [`ClockError::LengthMismatch`] if the vectors cover different participant sets.
pub fn compare(v1: &[u64], v2: &[u64]) -> Result<CausalOrder, ClockError> {
    if v1.len() != v2.len() {
        return Err(ClockError::LengthMismatch { expected: v1.len(), actual: v2.len() });
    }

    let mut less_or_equal = true;
    let mut greater_or_equal = true;

    for (a, b) in v1.iter().zip(v2) {
        if a > b {
            less_or_equal = false;
        }
        if a < b {
            greater_or_equal = false;
        }
    }

    Ok(match (less_or_equal, greater_or_equal) {
        (true, false) => CausalOrder::Before,
        (false, true) => CausalOrder::After,
        _ => CausalOrder::Concurrent,
    })
}

/// Element-wise maximum of `local` and `incoming`, returned as a new vector.
///
/// Neither input is modified, so a failed length check leaves no partial state.
pub fn merge(local: &[u64], incoming: &[u64]) -> Result<Vec<u64>, ClockError> {
    if local.len() != incoming.len() {
        return Err(ClockError::LengthMismatch { expected: local.len(), actual: incoming.len() });
    }
    Ok(local.iter().zip(incoming).map(|(a, b)| (*a).max(*b)).collect())
}

/// Per-participant vector of counters, sized once at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorClock {
    counters: Vec<u64>,
    own_index: usize,
}

impl VectorClock {
    /// Creates an all-zero clock for `participants` participants, owned by `own_index`.
    pub fn new(participants: usize, own_index: usize) -> Result<Self, ClockError> {
        if own_index >= participants {
            return Err(ClockError::OwnIndexOutOfRange { index: own_index, len: participants });
        }
        Ok(VectorClock { counters: vec![0; participants], own_index })
    }

    pub fn own_index(&self) -> usize {
        self.own_index
    }

    /// Number of participants this clock tracks.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Records a local event: bumps the owner's slot and returns a copy.
    pub fn local_event(&mut self) -> Vec<u64> {
        self.counters[self.own_index] = self.counters[self.own_index].saturating_add(1);
        self.counters.clone()
    }

    /// Records a send. The returned copy travels with the message.
    pub fn send_event(&mut self) -> Vec<u64> {
        self.local_event()
    }

    /// Merges a received vector, then bumps the owner's slot.
    ///
    /// The next state is computed in full before it replaces the current one.
    pub fn receive_event(&mut self, received: &[u64]) -> Result<Vec<u64>, ClockError> {
        let mut next = merge(&self.counters, received)?;
        next[self.own_index] = next[self.own_index].saturating_add(1);
        tracing::trace!(own = self.own_index, before = ?self.counters, after = ?next, "vector merge");
        self.counters = next;
        Ok(self.counters.clone())
    }

    pub fn current_value(&self) -> Vec<u64> {
        self.counters.clone()
    }
}

impl LogicalClock for VectorClock {
    type Value = Vec<u64>;

    fn local_event(&mut self) -> Vec<u64> {
        VectorClock::local_event(self)
    }

    fn receive_event(&mut self, received: &Vec<u64>) -> Result<Vec<u64>, ClockError> {
        VectorClock::receive_event(self, received)
    }

    fn current_value(&self) -> Vec<u64> {
        VectorClock::current_value(self)
    }
}
