//! Randomized workload generation for benchmarking runs.
//!
//! Randomness is always injected. The same seed yields the same script.

use crate::simulation::scenario::Scenario;
use rand::Rng;

/// Parameters of a randomized trace.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Workload {
    /// Each round gives every participant one chance to act.
    pub rounds: usize,
    /// Probability that a participant's action is a local event rather than a send.
    pub local_probability: f64,
    /// Pause inserted after each round, if any.
    pub pacing_millis: Option<u64>,
}

const DEFAULT_LOCAL_PROBABILITY: f64 = 1.0 / 3.0;

impl Default for Workload {
    fn default() -> Self {
        Workload { rounds: 10, local_probability: DEFAULT_LOCAL_PROBABILITY, pacing_millis: None }
    }
}

/// Clamps into `[0, 1]`. NaN falls back to the default probability.
fn sanitize_probability(p: f64) -> f64 {
    if p.is_nan() {
        tracing::warn!("local_probability is NaN, using the default");
        return DEFAULT_LOCAL_PROBABILITY;
    }
    p.clamp(0.0, 1.0)
}

impl Workload {
    pub fn new(rounds: usize, local_probability: f64) -> Self {
        Workload { rounds, local_probability: sanitize_probability(local_probability), pacing_millis: None }
    }

    pub fn with_pacing(mut self, millis: u64) -> Self {
        self.pacing_millis = Some(millis);
        self
    }

    /// Builds a script for `participants` participants.
    ///
    /// A participant that does not pick a local event sends to a uniformly
    /// chosen participant. If that happens to be itself it does nothing that round.
    pub fn generate<R: Rng + ?Sized>(&self, participants: usize, rng: &mut R) -> Scenario {
        let mut scenario = Scenario::new();
        if participants == 0 {
            return scenario;
        }
        let local_probability = sanitize_probability(self.local_probability);

        for round in 0..self.rounds {
            for p in 0..participants {
                if rng.gen_bool(local_probability) {
                    scenario = scenario.local(p, format!("Event {}", round));
                } else {
                    let target = rng.gen_range(0..participants);
                    if target != p {
                        scenario = scenario.send(p, target, format!("Msg {}", round));
                    }
                }
            }
            if let Some(millis) = self.pacing_millis {
                scenario = scenario.pause(millis);
            }
        }
        tracing::trace!(participants, rounds = self.rounds, steps = scenario.len(), "generated workload");
        scenario.settle()
    }
}
