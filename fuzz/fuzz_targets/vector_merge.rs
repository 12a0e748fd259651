#![no_main]

// Harness: vector_merge
// Strategy: arbitrary local/incoming vectors (lengths may differ). A receive
// either fails with a length mismatch and leaves the clock alone, or lands
// strictly after both inputs.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use logical_clocks::error::ClockError;
use logical_clocks::time::{compare, CausalOrder, VectorClock};

#[derive(Arbitrary, Debug)]
struct Input {
    own: u8,
    local: Vec<u32>,
    incoming: Vec<u32>,
}

fuzz_target!(|input: Input| {
    let n = input.local.len();
    if n == 0 {
        return;
    }
    let own = input.own as usize % n;
    let mut clock = VectorClock::new(n, own).unwrap();
    let mut seed: Vec<u64> = input.local.iter().map(|&x| x as u64).collect();
    seed[own] = 0;
    clock.receive_event(&seed).unwrap();
    let before = clock.current_value();

    let incoming: Vec<u64> = input.incoming.iter().map(|&x| x as u64).collect();
    match clock.receive_event(&incoming) {
        Ok(after) => {
            assert_eq!(compare(&before, &after).unwrap(), CausalOrder::Before);
            assert_eq!(compare(&incoming, &after).unwrap(), CausalOrder::Before);
            assert_eq!(compare(&after, &before).unwrap(), CausalOrder::After);
        }
        Err(err) => {
            assert_eq!(err, ClockError::LengthMismatch { expected: n, actual: incoming.len() });
            assert_eq!(clock.current_value(), before);
        }
    }
});
