//! Participant receive loop.
//!
//! `run` spawns a task that drains the inbox until `stop` is called. The task
//! also wakes every `poll_interval` with an empty inbox, so a stop request is
//! always noticed within one interval.

use crate::error::TraceError;
use crate::participant::core::Participant;
use crate::primitives::Packet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

impl Participant {
    /// Starts the receive loop on the current tokio runtime.
    ///
    /// The handle resolves to `Ok(())` after a stop, or to the first fatal
    /// error met while merging a packet (malformed payload, wrong vector
    /// length, wrong clock kind).
    pub fn run(self: &Arc<Self>) -> Result<JoinHandle<Result<(), TraceError>>, TraceError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| TraceError::NoRuntime(err.to_string()))?;
        let rx = self.inbox.take_receiver().ok_or(TraceError::AlreadyRunning(self.id()))?;
        let stop = self.stop_tx.subscribe();
        let this = Arc::clone(self);
        Ok(runtime.spawn(async move { this.receive_loop(rx, stop).await }))
    }

    /// Asks the receive loop to exit at its next wake-up.
    ///
    /// Packets still queued at that point are discarded, not merged.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub fn is_stopping(&self) -> bool {
        *self.stop_tx.borrow()
    }

    async fn receive_loop(
        self: Arc<Self>,
        mut rx: mpsc::UnboundedReceiver<Packet>,
        mut stop: watch::Receiver<bool>,
    ) -> Result<(), TraceError> {
        tracing::debug!(participant = %self.id(), "receive loop started");
        // `interval` rejects a zero period.
        let mut poll = tokio::time::interval(self.poll_interval.max(Duration::from_millis(1)));
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let outcome = loop {
            if *stop.borrow() {
                break Ok(());
            }
            tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() {
                        break Ok(());
                    }
                }
                packet = rx.recv() => match packet {
                    Some(packet) => {
                        let result = self.receive_message(packet);
                        self.in_flight.complete();
                        if let Err(err) = result {
                            tracing::error!(participant = %self.id(), error = %err, "fatal packet, stopping receive loop");
                            break Err(err);
                        }
                    }
                    None => break Ok(()),
                },
                _ = poll.tick() => {}
            }
        };

        // Nothing may enqueue past this point, and whatever is still queued is
        // accounted for so the trace can still reach quiescence. `recv` on a
        // closed channel also waits out sends that were already under way,
        // which `try_recv` would miss.
        rx.close();
        let mut dropped = 0usize;
        while rx.recv().await.is_some() {
            self.in_flight.complete();
            dropped += 1;
        }
        if dropped > 0 {
            tracing::warn!(participant = %self.id(), dropped, "receive loop exited with packets queued");
        }
        tracing::debug!(participant = %self.id(), "receive loop stopped");
        outcome
    }
}
