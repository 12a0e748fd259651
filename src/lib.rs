#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Logical clocks for ordering events across simulated processes.
//!
//! Two clock kinds are provided: a scalar Lamport clock and a vector clock.
//! Participants own one clock each, exchange clock values through their
//! inboxes, and record every local, send and receive event with the clock
//! value it produced. The trace harness drives participants through scripted
//! or randomized scenarios, and the analysis module measures how many event
//! pairs each clock kind can order.

// Shared identifiers and the clock kind selector.
pub mod types;

// Event records and the packets exchanged between participants.
pub mod primitives;

pub use primitives::*;

// Scalar and vector clocks, the vector comparator.
pub mod time;

pub mod error;

// Participants: clock + inbox + event log, and their receive loops.
pub mod participant;

// Trace harness, scenario scripts and randomized workloads.
pub mod simulation;

// Ordering-completeness analysis.
pub mod analysis;

pub mod config;

pub use analysis::{
    analyze, message_overhead_bytes, ordering_completeness, sort_total_order, total_order, OrderingReport,
};
pub use config::{ConfigError, TraceConfig};
pub use error::{ClockError, TraceError};
pub use participant::{InFlight, Participant};
pub use simulation::{Scenario, Step, Trace, Workload};
pub use time::{compare, merge, AnyClock, CausalOrder, ClockValue, LogicalClock, ScalarClock, VectorClock};
pub use types::{ClockKind, ParticipantId};
