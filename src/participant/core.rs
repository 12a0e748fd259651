//!
//! A simulated process: one logical clock, an inbox and an append-only event log.
//!
//! The clock and the log live behind a single lock, so every local, send and
//! receive event is applied as one unit: the clock advances and the matching
//! record is appended together, or neither happens.

use crate::error::TraceError;
use crate::participant::inbox::{InFlight, Inbox};
use crate::primitives::{EventKind, EventRecord, Packet};
use crate::time::{AnyClock, ClockValue, LogicalClock};
use crate::types::{ClockKind, ParticipantId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Poll interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
struct ParticipantState {
    clock: AnyClock,
    log: Vec<EventRecord>,
}

impl ParticipantState {
    fn append(&mut self, participant: ParticipantId, kind: EventKind, label: String, snapshot: ClockValue) -> EventRecord {
        let record = EventRecord { participant, sequence: self.log.len(), kind, label, snapshot };
        self.log.push(record.clone());
        record
    }
}

/// One participant of a trace.
#[derive(Debug)]
pub struct Participant {
    id: ParticipantId,
    kind: ClockKind,
    state: Mutex<ParticipantState>,
    pub(crate) inbox: Inbox,
    pub(crate) in_flight: Arc<InFlight>,
    pub(crate) stop_tx: watch::Sender<bool>,
    pub(crate) poll_interval: Duration,
}

impl Participant {
    /// Creates a standalone participant with its own in-flight tracker.
    pub fn new(id: ParticipantId, participants: usize, kind: ClockKind) -> Result<Self, TraceError> {
        Self::with_tracker(id, participants, kind, DEFAULT_POLL_INTERVAL, Arc::new(InFlight::new()))
    }

    /// Creates a participant that reports deliveries to a shared tracker.
    pub fn with_tracker(
        id: ParticipantId,
        participants: usize,
        kind: ClockKind,
        poll_interval: Duration,
        in_flight: Arc<InFlight>,
    ) -> Result<Self, TraceError> {
        if participants == 0 {
            return Err(TraceError::InvalidParticipantCount(participants));
        }
        let clock = AnyClock::new(kind, participants, id.index())?;
        let (stop_tx, _) = watch::channel(false);
        Ok(Participant {
            id,
            kind,
            state: Mutex::new(ParticipantState { clock, log: Vec::new() }),
            inbox: Inbox::new(),
            in_flight,
            stop_tx,
            poll_interval,
        })
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn kind(&self) -> ClockKind {
        self.kind
    }

    /// Tracker this participant's inbox reports to.
    pub fn in_flight(&self) -> &Arc<InFlight> {
        &self.in_flight
    }

    /// Records a local event.
    pub fn handle_local_event(&self, label: impl Into<String>) -> EventRecord {
        let mut state = self.state.lock();
        let snapshot = state.clock.local_event();
        let record = state.append(self.id, EventKind::Local, label.into(), snapshot);
        tracing::debug!(participant = %self.id, snapshot = %record.snapshot, label = %record.label, "local event");
        record
    }

    /// Records a send and delivers a packet carrying the new clock value into `target`'s inbox.
    ///
    /// The send is logged even if delivery then fails because the target's loop has shut down.
    pub fn send_message(&self, target: &Participant, payload: impl Into<String>) -> Result<EventRecord, TraceError> {
        let payload = payload.into();
        let (record, packet) = {
            let mut state = self.state.lock();
            let mut next = state.clock.clone();
            let snapshot = next.send_event();
            let packet = Packet::new(self.id, &snapshot, payload.clone()).map_err(|err| {
                TraceError::MalformedPacket { sender: self.id, reason: err.to_string() }
            })?;
            state.clock = next;
            let record = state.append(self.id, EventKind::Send { to: target.id }, payload, snapshot);
            (record, packet)
        };
        tracing::debug!(
            participant = %self.id,
            target = %target.id,
            snapshot = %record.snapshot,
            "send event"
        );
        target.deliver(packet)?;
        Ok(record)
    }

    /// Enqueues a packet for this participant's receive loop.
    pub fn deliver(&self, packet: Packet) -> Result<(), TraceError> {
        self.in_flight.begin();
        if let Err(packet) = self.inbox.push(packet) {
            self.in_flight.complete();
            tracing::warn!(participant = %self.id, sender = %packet.sender, "inbox closed, packet dropped");
            return Err(TraceError::InboxClosed(self.id));
        }
        Ok(())
    }

    /// Merges the clock value carried by `packet` and logs the receive with
    /// both the pre-merge and post-merge values.
    pub fn receive_message(&self, packet: Packet) -> Result<EventRecord, TraceError> {
        let received = packet.clock_value().map_err(|err| TraceError::MalformedPacket {
            sender: packet.sender,
            reason: err.to_string(),
        })?;

        let mut state = self.state.lock();
        let before = state.clock.current_value();
        let snapshot = state.clock.receive_event(&received)?;
        let kind = EventKind::Receive { from: packet.sender, received, before };
        let record = state.append(self.id, kind, packet.payload, snapshot);
        drop(state);

        tracing::debug!(participant = %self.id, from = %packet.sender, snapshot = %record.snapshot, "receive event");
        Ok(record)
    }

    /// Current clock value.
    pub fn current_value(&self) -> ClockValue {
        self.state.lock().clock.current_value()
    }

    /// Copy of the full event log, in recording order.
    pub fn log(&self) -> Vec<EventRecord> {
        self.state.lock().log.clone()
    }

    /// Number of events logged so far.
    pub fn log_len(&self) -> usize {
        self.state.lock().log.len()
    }
}
