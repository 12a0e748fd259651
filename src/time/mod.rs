//! Logical-time utilities (Lamport and vector clocks).
//!
//! Both clocks share the [`LogicalClock`] shape. A participant whose clock kind
//! is only known at runtime holds an [`AnyClock`], which speaks in
//! [`ClockValue`]s so snapshots of either kind can be logged and shipped the
//! same way.

pub mod scalar;
pub mod vector;

pub use scalar::ScalarClock;
pub use vector::{compare, merge, CausalOrder, VectorClock};

use crate::error::ClockError;
use crate::types::ClockKind;
use std::fmt;

/// Operations every logical clock offers.
pub trait LogicalClock: Send + fmt::Debug {
    /// Snapshot type returned by every operation.
    type Value: Clone + PartialEq + fmt::Debug + Send;

    /// Records a local event and returns the new value.
    fn local_event(&mut self) -> Self::Value;

    /// Records a send. Same effect as a local event; the value rides on the message.
    fn send_event(&mut self) -> Self::Value {
        self.local_event()
    }

    /// Merges a value carried by a received message.
    fn receive_event(&mut self, received: &Self::Value) -> Result<Self::Value, ClockError>;

    /// Current value, without advancing the clock.
    fn current_value(&self) -> Self::Value;
}

/// A clock snapshot of either kind, as stored in event logs and packets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockValue {
    Scalar(u64),
    Vector(Vec<u64>),
}

impl ClockValue {
    pub fn kind(&self) -> ClockKind {
        match self {
            ClockValue::Scalar(_) => ClockKind::Scalar,
            ClockValue::Vector(_) => ClockKind::Vector,
        }
    }

    pub fn as_scalar(&self) -> Option<u64> {
        match self {
            ClockValue::Scalar(t) => Some(*t),
            ClockValue::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[u64]> {
        match self {
            ClockValue::Vector(v) => Some(v),
            ClockValue::Scalar(_) => None,
        }
    }

    /// Encoded size on the wire under the fixed-width model: 8 bytes per counter.
    pub fn wire_size(&self) -> usize {
        match self {
            ClockValue::Scalar(_) => 8,
            ClockValue::Vector(v) => v.len() * 8,
        }
    }
}

impl fmt::Display for ClockValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockValue::Scalar(t) => write!(f, "T{}", t),
            ClockValue::Vector(v) => {
                f.write_str("[")?;
                for (i, c) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A clock whose kind is chosen when the trace is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyClock {
    Scalar(ScalarClock),
    Vector(VectorClock),
}

impl AnyClock {
    /// Builds the clock for participant `own_index` out of `participants`.
    pub fn new(kind: ClockKind, participants: usize, own_index: usize) -> Result<Self, ClockError> {
        match kind {
            ClockKind::Scalar => Ok(AnyClock::Scalar(ScalarClock::new())),
            ClockKind::Vector => Ok(AnyClock::Vector(VectorClock::new(participants, own_index)?)),
        }
    }

    pub fn kind(&self) -> ClockKind {
        match self {
            AnyClock::Scalar(_) => ClockKind::Scalar,
            AnyClock::Vector(_) => ClockKind::Vector,
        }
    }
}

impl LogicalClock for AnyClock {
    type Value = ClockValue;

    fn local_event(&mut self) -> ClockValue {
        match self {
            AnyClock::Scalar(c) => ClockValue::Scalar(c.local_event()),
            AnyClock::Vector(c) => ClockValue::Vector(c.local_event()),
        }
    }

    fn send_event(&mut self) -> ClockValue {
        match self {
            AnyClock::Scalar(c) => ClockValue::Scalar(c.send_event()),
            AnyClock::Vector(c) => ClockValue::Vector(c.send_event()),
        }
    }

    fn receive_event(&mut self, received: &ClockValue) -> Result<ClockValue, ClockError> {
        match (self, received) {
            (AnyClock::Scalar(c), ClockValue::Scalar(t)) => Ok(ClockValue::Scalar(c.receive_event(*t))),
            (AnyClock::Vector(c), ClockValue::Vector(v)) => Ok(ClockValue::Vector(c.receive_event(v)?)),
            (clock, value) => Err(ClockError::KindMismatch { expected: clock.kind(), actual: value.kind() }),
        }
    }

    fn current_value(&self) -> ClockValue {
        match self {
            AnyClock::Scalar(c) => ClockValue::Scalar(c.current_value()),
            AnyClock::Vector(c) => ClockValue::Vector(c.current_value()),
        }
    }
}
