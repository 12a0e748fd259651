//! Inbox plumbing: the per-participant packet queue and the trace-wide
//! in-flight counter that lets the harness wait for a real drain.

use crate::primitives::Packet;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, Notify};

/// Counts packets that have been enqueued but not yet processed.
///
/// A count of zero is an observable quiescent point: every packet sent so far
/// has been merged into its receiver's clock (or discarded by a stopped loop).
#[derive(Debug, Default)]
pub struct InFlight {
    pending: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub(crate) fn begin(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn complete(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }

    /// Resolves once no packet is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a completion between the check and the await is not lost.
            notified.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Many-producer, single-consumer queue. Any participant may enqueue; only the
/// owner's receive loop takes the receiving half.
#[derive(Debug)]
pub(crate) struct Inbox {
    tx: mpsc::UnboundedSender<Packet>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<Packet>>>,
}

impl Inbox {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Inbox { tx, rx: Mutex::new(Some(rx)) }
    }

    /// Enqueues a packet, handing it back if the receiving half is gone.
    pub(crate) fn push(&self, packet: Packet) -> Result<(), Packet> {
        self.tx.send(packet).map_err(|err| err.0)
    }

    /// Takes the receiving half. Returns `None` once it has been taken.
    pub(crate) fn take_receiver(&self) -> Option<mpsc::UnboundedReceiver<Packet>> {
        self.rx.lock().take()
    }
}
