pub mod core;
pub mod inbox;
pub mod runtime;

#[cfg(test)]
mod tests;

pub use self::core::{Participant, DEFAULT_POLL_INTERVAL};
pub use inbox::InFlight;
