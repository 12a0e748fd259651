//! Ordering-completeness analysis.
//!
//! Measures, over every unordered pair of recorded events, how many pairs a
//! clock can place relative to each other. Vector snapshots always decide: a
//! pair is Before, After or Concurrent, and all three count as decided. Scalar
//! timestamps decide only when they differ. Equal timestamps leave the pair
//! undecidable and it is excluded from the orderable count.
//!
//! The analysis works from the per-event snapshots stored in the logs. The
//! clocks' final values would collapse every event of a participant onto one
//! value and make the measurement meaningless.

use crate::error::ClockError;
use crate::primitives::EventRecord;
use crate::time::{compare, CausalOrder, ClockValue};
use crate::types::ClockKind;
use std::cmp::Ordering;

/// Pairwise breakdown of a set of recorded events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderingReport {
    pub events: usize,
    pub total_pairs: usize,
    /// Pairs whose first event is placed before the second.
    pub before: usize,
    /// Pairs whose first event is placed after the second.
    pub after: usize,
    /// Pairs a vector clock identified as concurrent.
    pub concurrent: usize,
    /// Pairs with equal scalar timestamps.
    pub undecidable: usize,
}

impl OrderingReport {
    pub fn orderable_pairs(&self) -> usize {
        self.total_pairs - self.undecidable
    }

    /// `orderable_pairs / total_pairs`, or 1.0 when there are no pairs.
    pub fn completeness(&self) -> f64 {
        if self.total_pairs == 0 {
            return 1.0;
        }
        self.orderable_pairs() as f64 / self.total_pairs as f64
    }
}

/// Classifies every unordered pair of `records`.
///
/// # Errors
/// - [`ClockError::KindMismatch`] if the records mix scalar and vector snapshots.
/// - [`ClockError::LengthMismatch`] if vector snapshots differ in length.
pub fn analyze(records: &[EventRecord]) -> Result<OrderingReport, ClockError> {
    let mut report = OrderingReport { events: records.len(), ..OrderingReport::default() };

    for (i, a) in records.iter().enumerate() {
        for b in &records[i + 1..] {
            report.total_pairs += 1;
            match (&a.snapshot, &b.snapshot) {
                (ClockValue::Scalar(t1), ClockValue::Scalar(t2)) => {
                    if t1 < t2 {
                        report.before += 1;
                    } else if t1 > t2 {
                        report.after += 1;
                    } else {
                        report.undecidable += 1;
                    }
                }
                (ClockValue::Vector(v1), ClockValue::Vector(v2)) => match compare(v1, v2)? {
                    CausalOrder::Before => report.before += 1,
                    CausalOrder::After => report.after += 1,
                    CausalOrder::Concurrent => report.concurrent += 1,
                },
                (first, second) => {
                    return Err(ClockError::KindMismatch { expected: first.kind(), actual: second.kind() });
                }
            }
        }
    }

    tracing::debug!(
        events = report.events,
        pairs = report.total_pairs,
        undecidable = report.undecidable,
        "ordering analysis complete"
    );
    Ok(report)
}

/// Fraction in `[0, 1]` of event pairs whose order the recorded snapshots can decide.
pub fn ordering_completeness(records: &[EventRecord]) -> Result<f64, ClockError> {
    analyze(records).map(|report| report.completeness())
}

/// Deterministic total order over scalar-stamped events: timestamp first,
/// then participant id, then log position.
///
/// The tie-break is arbitrary. Two events ordered this way may well be
/// concurrent; the order only gives every replica the same sequence. It plays
/// no part in [`analyze`], where equal timestamps stay undecidable.
///
/// # Errors
/// [`ClockError::KindMismatch`] if either snapshot is a vector.
pub fn total_order(a: &EventRecord, b: &EventRecord) -> Result<Ordering, ClockError> {
    let stamp = |record: &EventRecord| {
        record.snapshot.as_scalar().ok_or(ClockError::KindMismatch {
            expected: ClockKind::Scalar,
            actual: record.snapshot.kind(),
        })
    };
    let (ta, tb) = (stamp(a)?, stamp(b)?);
    Ok(ta.cmp(&tb).then(a.participant.cmp(&b.participant)).then(a.sequence.cmp(&b.sequence)))
}

/// Sorts scalar-stamped records by [`total_order`].
pub fn sort_total_order(records: &mut [EventRecord]) -> Result<(), ClockError> {
    if let Some(bad) = records.iter().find(|r| r.snapshot.kind() != ClockKind::Scalar) {
        return Err(ClockError::KindMismatch { expected: ClockKind::Scalar, actual: bad.snapshot.kind() });
    }
    records.sort_by_key(|r| (r.snapshot.as_scalar().unwrap_or_default(), r.participant, r.sequence));
    Ok(())
}

/// Bytes of clock metadata each message carries, at 8 bytes per counter.
pub fn message_overhead_bytes(kind: ClockKind, participants: usize) -> usize {
    match kind {
        ClockKind::Scalar => 8,
        ClockKind::Vector => 8 * participants,
    }
}
