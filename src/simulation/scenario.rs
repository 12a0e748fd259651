//! Scenario scripts: ordered local/send steps with optional pacing.

use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};

/// One instruction of a scenario script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Local { participant: ParticipantId, label: String },
    Send { from: ParticipantId, to: ParticipantId, payload: String },
    /// Sleeps for a while, giving receive loops room to interleave.
    Pause { millis: u64 },
    /// Waits until every packet sent so far has been merged by its receiver.
    Settle,
}

/// An ordered script of steps run against a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local(mut self, participant: usize, label: impl Into<String>) -> Self {
        self.steps.push(Step::Local { participant: ParticipantId(participant), label: label.into() });
        self
    }

    pub fn send(mut self, from: usize, to: usize, payload: impl Into<String>) -> Self {
        self.steps.push(Step::Send {
            from: ParticipantId(from),
            to: ParticipantId(to),
            payload: payload.into(),
        });
        self
    }

    pub fn pause(mut self, millis: u64) -> Self {
        self.steps.push(Step::Pause { millis });
        self
    }

    pub fn settle(mut self) -> Self {
        self.steps.push(Step::Settle);
        self
    }

    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Highest participant index any step refers to.
    pub fn max_participant(&self) -> Option<ParticipantId> {
        self.steps
            .iter()
            .flat_map(|step| match step {
                Step::Local { participant, .. } => vec![*participant],
                Step::Send { from, to, .. } => vec![*from, *to],
                Step::Pause { .. } | Step::Settle => Vec::new(),
            })
            .max()
    }

    /// Three participants: independent start-up work, then a P0 -> P1 -> P2 -> P0
    /// message cycle, then two final local events on P0 and P2 that are concurrent.
    pub fn causal_cycle() -> Self {
        Scenario::new()
            .local(0, "Initialize P0")
            .local(1, "Initialize P1")
            .local(2, "Initialize P2")
            .pause(10)
            .local(1, "P1 local work")
            .local(2, "P2 local work")
            .pause(10)
            .local(0, "Event A")
            .send(0, 1, "Message from P0")
            .settle()
            .local(1, "Event B")
            .send(1, 2, "Message from P1")
            .settle()
            .local(2, "Event C")
            .send(2, 0, "Message from P2")
            .settle()
            .local(0, "Event D")
            .local(2, "Event E")
    }

    /// P1 and P2 each do `rounds` local events, then both send to P0 with no
    /// causal link between the two sends.
    pub fn concurrent_arrival(rounds: usize) -> Self {
        let mut scenario = Scenario::new();
        for i in 1..=rounds {
            scenario = scenario.local(1, format!("Work-{}", i)).local(2, format!("Work-{}", i));
        }
        scenario.send(1, 0, "Data from P1").send(2, 0, "Data from P2").settle()
    }
}
