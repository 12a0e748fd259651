//! Simulation harness: traces, scenario scripts and randomized workloads.

pub mod scenario;
pub mod trace;
pub mod workload;

pub use scenario::{Scenario, Step};
pub use trace::Trace;
pub use workload::Workload;
