//!
//! Defines error types for the clocks and the trace harness.
//!
//! None of these are retriable. Every variant describes a configuration or
//! programming mistake and is surfaced to the caller as soon as it is detected.

use crate::types::{ClockKind, ParticipantId};

/// Errors raised by the clocks themselves and by the vector comparator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Two vectors that must describe the same participant set differ in length.
    #[error("vector length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// A vector clock was created with its owner outside the vector.
    #[error("own index {index} out of range for {len} participants")]
    OwnIndexOutOfRange { index: usize, len: usize },
    /// A scalar value was handed to a vector clock or the other way round.
    #[error("clock kind mismatch: expected {expected}, got {actual}")]
    KindMismatch { expected: ClockKind, actual: ClockKind },
    /// The clock kind string is not one of the supported kinds.
    #[error("unknown clock kind: {0}")]
    UnknownClockKind(String),
}

/// Errors raised by participants and by the trace harness.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceError {
    #[error("clock error: {0}")]
    Clock(#[from] ClockError),
    /// A trace needs at least one participant.
    #[error("invalid participant count: {0}")]
    InvalidParticipantCount(usize),
    /// A step or call referenced a participant the trace does not own.
    #[error("unknown participant {0}")]
    UnknownParticipant(ParticipantId),
    /// An inbox packet could not be decoded into a clock value.
    #[error("malformed packet from {sender}: {reason}")]
    MalformedPacket { sender: ParticipantId, reason: String },
    /// The participant's receive loop was started twice.
    #[error("participant {0} is already running")]
    AlreadyRunning(ParticipantId),
    /// The participant's inbox no longer accepts packets (its loop failed or stopped).
    #[error("inbox of participant {0} is closed")]
    InboxClosed(ParticipantId),
    /// A scenario was run before the participant loops were started.
    #[error("trace has not been started")]
    NotStarted,
    /// `run` was called outside a tokio runtime.
    #[error("no async runtime available: {0}")]
    NoRuntime(String),
    /// A receive loop panicked or was aborted.
    #[error("participant task failed: {0}")]
    TaskFailed(String),
}
