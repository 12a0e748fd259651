#![cfg(test)]

use crate::error::{ClockError, TraceError};
use crate::participant::{InFlight, Participant};
use crate::primitives::{EventKind, Packet};
use crate::time::ClockValue;
use crate::types::{ClockKind, ParticipantId};
use std::sync::Arc;
use std::time::Duration;

// --- Test Utilities ---

const P0: ParticipantId = ParticipantId(0);
const P1: ParticipantId = ParticipantId(1);
const P2: ParticipantId = ParticipantId(2);

fn shared_pair(kind: ClockKind) -> (Arc<Participant>, Arc<Participant>, Arc<InFlight>) {
    let in_flight = Arc::new(InFlight::new());
    let make = |id| {
        Arc::new(
            Participant::with_tracker(id, 2, kind, Duration::from_millis(5), Arc::clone(&in_flight))
                .expect("participant should build"),
        )
    };
    let p0 = make(P0);
    let p1 = make(P1);
    (p0, p1, in_flight)
}

fn vector_packet(sender: ParticipantId, v: Vec<u64>, payload: &str) -> Packet {
    Packet::new(sender, &ClockValue::Vector(v), payload).unwrap()
}

async fn settle(in_flight: &InFlight) {
    tokio::time::timeout(Duration::from_secs(5), in_flight.wait_idle())
        .await
        .expect("in-flight packets should drain");
}

// --- Test Cases ---

#[test]
fn test_participant_new() {
    let p = Participant::new(P1, 3, ClockKind::Vector).unwrap();
    assert_eq!(p.id(), P1);
    assert_eq!(p.kind(), ClockKind::Vector);
    assert_eq!(p.current_value(), ClockValue::Vector(vec![0, 0, 0]));
    assert!(p.log().is_empty());
}

#[test]
fn test_participant_rejects_zero_participants() {
    assert_eq!(
        Participant::new(P0, 0, ClockKind::Scalar).unwrap_err(),
        TraceError::InvalidParticipantCount(0)
    );
}

#[test]
fn test_participant_rejects_id_outside_vector() {
    assert_eq!(
        Participant::new(ParticipantId(3), 3, ClockKind::Vector).unwrap_err(),
        TraceError::Clock(ClockError::OwnIndexOutOfRange { index: 3, len: 3 })
    );
}

#[test]
fn test_local_events_are_logged_in_order() {
    let p = Participant::new(P0, 2, ClockKind::Scalar).unwrap();
    let first = p.handle_local_event("Initialize P0");
    let second = p.handle_local_event("Event A");

    assert_eq!(first.sequence, 0);
    assert_eq!(first.snapshot, ClockValue::Scalar(1));
    assert_eq!(second.sequence, 1);
    assert_eq!(second.snapshot, ClockValue::Scalar(2));
    assert_eq!(p.log(), vec![first, second]);
}

#[test]
fn test_logged_snapshots_do_not_follow_the_clock() {
    let p = Participant::new(P0, 2, ClockKind::Vector).unwrap();
    p.handle_local_event("a");
    p.handle_local_event("b");
    p.handle_local_event("c");

    let log = p.log();
    assert_eq!(log[0].snapshot, ClockValue::Vector(vec![1, 0]));
    assert_eq!(log[2].snapshot, ClockValue::Vector(vec![3, 0]));
    assert_eq!(p.current_value(), ClockValue::Vector(vec![3, 0]));
}

#[test]
fn test_receive_message_records_pre_and_post_merge_state() {
    let p1 = Participant::new(P1, 2, ClockKind::Vector).unwrap();
    p1.handle_local_event("work");

    let record = p1.receive_message(vector_packet(P0, vec![1, 0], "Message from P0")).unwrap();

    assert_eq!(record.snapshot, ClockValue::Vector(vec![1, 2]));
    assert_eq!(
        record.kind,
        EventKind::Receive {
            from: P0,
            received: ClockValue::Vector(vec![1, 0]),
            before: ClockValue::Vector(vec![0, 1]),
        }
    );
    assert_eq!(record.label, "Message from P0");
}

#[test]
fn test_receive_message_rejects_wrong_vector_length() {
    let p = Participant::new(P0, 3, ClockKind::Vector).unwrap();
    p.handle_local_event("work");

    let err = p.receive_message(vector_packet(P1, vec![1, 1], "short")).unwrap_err();

    assert_eq!(err, TraceError::Clock(ClockError::LengthMismatch { expected: 3, actual: 2 }));
    assert_eq!(p.current_value(), ClockValue::Vector(vec![1, 0, 0]));
    assert_eq!(p.log_len(), 1);
}

#[test]
fn test_receive_message_rejects_unparsable_clock() {
    let p = Participant::new(P0, 2, ClockKind::Scalar).unwrap();
    let packet = Packet { sender: P1, clock: b"5|hello".to_vec(), payload: "hello".into() };

    let err = p.receive_message(packet).unwrap_err();

    assert!(matches!(err, TraceError::MalformedPacket { sender, .. } if sender == P1));
    assert!(p.log().is_empty());
}

#[test]
fn test_receive_message_rejects_other_clock_kind() {
    let p = Participant::new(P0, 2, ClockKind::Scalar).unwrap();
    let err = p.receive_message(vector_packet(P1, vec![0, 1], "vector into scalar")).unwrap_err();
    assert_eq!(
        err,
        TraceError::Clock(ClockError::KindMismatch { expected: ClockKind::Scalar, actual: ClockKind::Vector })
    );
}

#[tokio::test]
async fn test_send_then_receive_through_loop() {
    let (p0, p1, in_flight) = shared_pair(ClockKind::Vector);
    let h0 = p0.run().unwrap();
    let h1 = p1.run().unwrap();

    let sent = p0.send_message(&p1, "Message from P0").unwrap();
    assert_eq!(sent.kind, EventKind::Send { to: P1 });
    assert_eq!(sent.snapshot, ClockValue::Vector(vec![1, 0]));

    settle(&in_flight).await;
    let received = p1.log();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].snapshot, ClockValue::Vector(vec![1, 1]));

    p0.stop();
    p1.stop();
    assert_eq!(h0.await.unwrap(), Ok(()));
    assert_eq!(h1.await.unwrap(), Ok(()));
}

#[tokio::test]
async fn test_packets_wait_in_inbox_until_run() {
    let (p0, p1, in_flight) = shared_pair(ClockKind::Scalar);
    p0.handle_local_event("a");
    p0.send_message(&p1, "early").unwrap();
    assert_eq!(in_flight.pending(), 1);
    assert!(p1.log().is_empty());

    let handle = p1.run().unwrap();
    settle(&in_flight).await;
    assert_eq!(p1.current_value(), ClockValue::Scalar(3));

    p1.stop();
    assert_eq!(handle.await.unwrap(), Ok(()));
}

#[tokio::test]
async fn test_run_twice_is_rejected() {
    let p = Arc::new(Participant::new(P0, 1, ClockKind::Scalar).unwrap());
    let handle = p.run().unwrap();
    assert_eq!(p.run().unwrap_err(), TraceError::AlreadyRunning(P0));
    p.stop();
    assert_eq!(handle.await.unwrap(), Ok(()));
}

#[test]
fn test_run_outside_runtime_is_rejected() {
    let p = Arc::new(Participant::new(P0, 1, ClockKind::Scalar).unwrap());
    assert!(matches!(p.run(), Err(TraceError::NoRuntime(_))));
}

#[tokio::test]
async fn test_stop_is_observed_with_empty_inbox() {
    let p = Arc::new(
        Participant::with_tracker(P2, 3, ClockKind::Vector, Duration::from_millis(10), Arc::new(InFlight::new()))
            .unwrap(),
    );
    let handle = p.run().unwrap();
    tokio::time::sleep(Duration::from_millis(25)).await;
    p.stop();
    assert!(p.is_stopping());

    let joined = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop should notice the stop signal");
    assert_eq!(joined.unwrap(), Ok(()));
}

#[tokio::test]
async fn test_fatal_packet_stops_loop_and_closes_inbox() {
    let (p0, p1, in_flight) = shared_pair(ClockKind::Vector);
    let handle = p1.run().unwrap();

    p1.deliver(vector_packet(P0, vec![9, 9, 9], "bad")).unwrap();
    let joined = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop should exit on a fatal packet")
        .unwrap();
    assert_eq!(joined, Err(TraceError::Clock(ClockError::LengthMismatch { expected: 2, actual: 3 })));

    settle(&in_flight).await;
    assert_eq!(p0.send_message(&p1, "too late").unwrap_err(), TraceError::InboxClosed(P1));
    assert_eq!(in_flight.pending(), 0);
    // The send itself still happened on the sender's side.
    assert_eq!(p0.log_len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_drain_accounts_for_sends_racing_a_fatal_exit() {
    let (p0, p1, in_flight) = shared_pair(ClockKind::Vector);
    let handle = p1.run().unwrap();

    let senders: Vec<_> = (0..4)
        .map(|_| {
            let (from, to) = (Arc::clone(&p0), Arc::clone(&p1));
            tokio::spawn(async move {
                for i in 0..200 {
                    // Sends after the loop died are refused; that is expected here.
                    let _ = from.send_message(&to, format!("msg {i}"));
                    if i % 16 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        })
        .collect();

    tokio::task::yield_now().await;
    p1.deliver(vector_packet(P0, vec![1, 1, 1], "bad")).unwrap();

    for sender in senders {
        sender.await.unwrap();
    }
    let joined = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop should exit on a fatal packet")
        .unwrap();
    assert!(matches!(joined, Err(TraceError::Clock(ClockError::LengthMismatch { .. }))));

    settle(&in_flight).await;
    assert_eq!(in_flight.pending(), 0);
    assert_eq!(p0.log_len(), 800);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_drain_accounts_for_sends_racing_a_stop() {
    let (p0, p1, in_flight) = shared_pair(ClockKind::Scalar);
    let handle = p1.run().unwrap();

    let sender = {
        let (from, to) = (Arc::clone(&p0), Arc::clone(&p1));
        tokio::spawn(async move {
            for i in 0..500 {
                let _ = from.send_message(&to, format!("msg {i}"));
            }
        })
    };
    p1.stop();

    sender.await.unwrap();
    assert_eq!(tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap(), Ok(()));
    settle(&in_flight).await;
    assert_eq!(in_flight.pending(), 0);
}

#[test]
fn test_current_value_read_is_idempotent() {
    let p = Participant::new(P1, 3, ClockKind::Vector).unwrap();
    p.handle_local_event("a");
    p.receive_message(vector_packet(P0, vec![2, 0, 0], "m")).unwrap();

    let first = p.current_value();
    assert_eq!(first, p.current_value());
    assert_eq!(first, ClockValue::Vector(vec![2, 2, 0]));
    assert_eq!(p.log_len(), 2);
}
