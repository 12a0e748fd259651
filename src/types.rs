//! Shared identifiers and enums used across the clocks, participants and the harness.

use crate::error::ClockError;
use std::fmt;
use std::str::FromStr;

/// Position of a participant within a trace. Doubles as its slot in every vector clock.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub usize);

impl ParticipantId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl From<usize> for ParticipantId {
    fn from(value: usize) -> Self {
        ParticipantId(value)
    }
}

/// Which logical clock a trace runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    /// Lamport timestamps: one counter per participant.
    #[serde(alias = "lamport")]
    Scalar,
    /// Every participant keeps a counter for every participant.
    Vector,
}

impl fmt::Display for ClockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockKind::Scalar => f.write_str("scalar"),
            ClockKind::Vector => f.write_str("vector"),
        }
    }
}

impl FromStr for ClockKind {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" | "lamport" => Ok(ClockKind::Scalar),
            "vector" => Ok(ClockKind::Vector),
            other => Err(ClockError::UnknownClockKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_kind_parses_known_names() {
        assert_eq!("scalar".parse::<ClockKind>(), Ok(ClockKind::Scalar));
        assert_eq!("Lamport".parse::<ClockKind>(), Ok(ClockKind::Scalar));
        assert_eq!(" vector ".parse::<ClockKind>(), Ok(ClockKind::Vector));
    }

    #[test]
    fn clock_kind_rejects_unknown_names() {
        assert_eq!(
            "hybrid".parse::<ClockKind>(),
            Err(ClockError::UnknownClockKind("hybrid".into()))
        );
    }

    #[test]
    fn participant_id_displays_as_process_label() {
        assert_eq!(ParticipantId(2).to_string(), "P2");
    }
}
