//!
//! The trace harness: a fixed set of participants sharing one in-flight
//! tracker, started and stopped as a unit.
//!
//! Logs are only read after a drain. `settle` waits until the tracker reports
//! zero packets in flight, so every send has been merged by its receiver
//! before anything is analysed.

use crate::analysis::{self, OrderingReport};
use crate::config::TraceConfig;
use crate::error::TraceError;
use crate::participant::{InFlight, Participant};
use crate::primitives::EventRecord;
use crate::simulation::scenario::{Scenario, Step};
use crate::types::{ClockKind, ParticipantId};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Owns the participants of one trace.
#[derive(Debug)]
pub struct Trace {
    config: TraceConfig,
    participants: Vec<Arc<Participant>>,
    in_flight: Arc<InFlight>,
    handles: Vec<JoinHandle<Result<(), TraceError>>>,
}

impl Trace {
    /// Builds `participant_count` participants running `kind` clocks.
    pub fn new(participant_count: usize, kind: ClockKind) -> Result<Self, TraceError> {
        Self::with_config(TraceConfig::new(participant_count, kind))
    }

    pub fn with_config(config: TraceConfig) -> Result<Self, TraceError> {
        if config.participants == 0 {
            return Err(TraceError::InvalidParticipantCount(config.participants));
        }
        let in_flight = Arc::new(InFlight::new());
        let participants = (0..config.participants)
            .map(|i| {
                Participant::with_tracker(
                    ParticipantId(i),
                    config.participants,
                    config.clock,
                    config.poll_interval(),
                    Arc::clone(&in_flight),
                )
                .map(Arc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(participants = config.participants, clock = %config.clock, "trace created");
        Ok(Trace { config, participants, in_flight, handles: Vec::new() })
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn kind(&self) -> ClockKind {
        self.config.clock
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_running(&self) -> bool {
        !self.handles.is_empty()
    }

    pub fn participants(&self) -> &[Arc<Participant>] {
        &self.participants
    }

    pub fn participant(&self, id: ParticipantId) -> Result<&Arc<Participant>, TraceError> {
        self.participants.get(id.index()).ok_or(TraceError::UnknownParticipant(id))
    }

    /// Packets sent but not yet merged.
    pub fn in_flight(&self) -> usize {
        self.in_flight.pending()
    }

    /// Starts every participant's receive loop.
    pub fn start(&mut self) -> Result<(), TraceError> {
        if self.is_running() {
            return Ok(());
        }
        for participant in &self.participants {
            let handle = participant.run()?;
            self.handles.push(handle);
        }
        tracing::debug!(participants = self.participants.len(), "trace started");
        Ok(())
    }

    /// Records a local event on `id`.
    pub fn local(&self, id: ParticipantId, label: impl Into<String>) -> Result<EventRecord, TraceError> {
        Ok(self.participant(id)?.handle_local_event(label))
    }

    /// Sends a message from `from` to `to`.
    pub fn send(&self, from: ParticipantId, to: ParticipantId, payload: impl Into<String>) -> Result<EventRecord, TraceError> {
        let sender = self.participant(from)?;
        let target = self.participant(to)?;
        sender.send_message(target, payload)
    }

    /// Waits until no packet is in flight.
    ///
    /// Packets are only drained while the trace is running, so calling this on
    /// a stopped trace with packets in flight would never return.
    pub async fn settle(&self) -> Result<(), TraceError> {
        if !self.is_running() && self.in_flight.pending() > 0 {
            return Err(TraceError::NotStarted);
        }
        self.in_flight.wait_idle().await;
        Ok(())
    }

    /// Runs `scenario` step by step, then settles.
    pub async fn run_scenario(&self, scenario: &Scenario) -> Result<(), TraceError> {
        if !self.is_running() {
            return Err(TraceError::NotStarted);
        }
        if let Some(max) = scenario.max_participant() {
            self.participant(max)?;
        }

        for step in &scenario.steps {
            match step {
                Step::Local { participant, label } => {
                    self.local(*participant, label.clone())?;
                }
                Step::Send { from, to, payload } => {
                    self.send(*from, *to, payload.clone())?;
                }
                Step::Pause { millis } => tokio::time::sleep(Duration::from_millis(*millis)).await,
                Step::Settle => self.settle().await?,
            }
        }
        self.settle().await
    }

    /// Drains in-flight packets, then stops and joins every receive loop.
    ///
    /// Returns the first error any loop ended with.
    pub async fn stop(&mut self) -> Result<(), TraceError> {
        if !self.is_running() {
            return Ok(());
        }
        self.in_flight.wait_idle().await;
        for participant in &self.participants {
            participant.stop();
        }

        let mut first_error = None;
        for handle in self.handles.drain(..) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_err) => Err(TraceError::TaskFailed(join_err.to_string())),
            };
            if let Err(err) = outcome {
                first_error.get_or_insert(err);
            }
        }
        tracing::debug!(failed = first_error.is_some(), "trace stopped");
        first_error.map_or(Ok(()), Err)
    }

    /// Each participant's log, indexed by participant.
    pub fn logs(&self) -> Vec<Vec<EventRecord>> {
        self.participants.iter().map(|p| p.log()).collect()
    }

    /// Every recorded event, grouped by participant in id order.
    pub fn records(&self) -> Vec<EventRecord> {
        self.participants.iter().flat_map(|p| p.log()).collect()
    }

    /// Pairwise ordering breakdown over every recorded event.
    pub fn ordering_report(&self) -> Result<OrderingReport, TraceError> {
        Ok(analysis::analyze(&self.records())?)
    }

    /// Fraction of recorded event pairs the trace's clock can order.
    pub fn ordering_completeness(&self) -> Result<f64, TraceError> {
        Ok(analysis::ordering_completeness(&self.records())?)
    }
}

impl Drop for Trace {
    fn drop(&mut self) {
        // Loops that are still running exit at their next wake-up.
        for participant in &self.participants {
            participant.stop();
        }
    }
}
