use crate::time::ClockValue;
use crate::types::ParticipantId;
use std::fmt;

// --- Event log ---------------------------------------------------------------

/// What a logged event did.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Local,
    Send { to: ParticipantId },
    /// `received` is the value carried by the packet, `before` the clock just prior to the merge.
    Receive { from: ParticipantId, received: ClockValue, before: ClockValue },
}

/// One entry of a participant's append-only log.
///
/// `snapshot` is the exact clock value at the moment the event was recorded.
/// Later activity on the participant never alters it, which is what lets the
/// analysis pass compare events long after the trace has moved on.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventRecord {
    pub participant: ParticipantId,
    /// Position within the owning participant's log, starting at 0.
    pub sequence: usize,
    pub kind: EventKind,
    pub label: String,
    pub snapshot: ClockValue,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EventKind::Local => {
                write!(f, "{}: Local event {}: {}", self.participant, self.snapshot, self.label)
            }
            EventKind::Send { to } => {
                write!(f, "{}: Send to {} at {}: {}", self.participant, to, self.snapshot, self.label)
            }
            EventKind::Receive { from, received, before } => write!(
                f,
                "{}: Receive from {} (received {}, was {} -> synchronized to {}): {}",
                self.participant, from, received, before, self.snapshot, self.label
            ),
        }
    }
}

// --- Wire packet -------------------------------------------------------------

/// A message in flight between two participants.
///
/// The sender's clock value is carried serialized, so causal information only
/// crosses participant boundaries as bytes, never as a shared clock.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Packet {
    pub sender: ParticipantId,
    /// `serde_json` encoding of a [`ClockValue`].
    pub clock: Vec<u8>,
    pub payload: String,
}

impl Packet {
    /// Builds a packet, serializing `clock`.
    pub fn new(sender: ParticipantId, clock: &ClockValue, payload: impl Into<String>) -> Result<Self, serde_json::Error> {
        Ok(Packet { sender, clock: serde_json::to_vec(clock)?, payload: payload.into() })
    }

    /// Decodes the carried clock value.
    pub fn clock_value(&self) -> Result<ClockValue, serde_json::Error> {
        serde_json::from_slice(&self.clock)
    }
}
