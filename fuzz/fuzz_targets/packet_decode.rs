#![no_main]

// Harness: packet_decode
// Strategy: arbitrary bytes as the clock field of an inbound packet. Decoding
// must never panic, and a receive may only fail with an error, never leave the
// participant's log or clock half-updated.

use libfuzzer_sys::fuzz_target;
use logical_clocks::participant::Participant;
use logical_clocks::primitives::Packet;
use logical_clocks::types::{ClockKind, ParticipantId};

fuzz_target!(|bytes: Vec<u8>| {
    let packet = Packet { sender: ParticipantId(1), clock: bytes, payload: String::new() };
    let _ = packet.clock_value();

    for kind in [ClockKind::Scalar, ClockKind::Vector] {
        let participant = Participant::new(ParticipantId(0), 3, kind).unwrap();
        participant.handle_local_event("seed");
        let before = participant.current_value();
        match participant.receive_message(packet.clone()) {
            Ok(record) => assert_eq!(record.snapshot, participant.current_value()),
            Err(_) => {
                assert_eq!(participant.current_value(), before);
                assert_eq!(participant.log_len(), 1);
            }
        }
    }
});
