//! The scripted receptionist: extractors and classifiers over caller text,
//! canned replies, and the state machine that strings them together.

pub mod classify;
pub mod clinic;
pub mod extract;
pub mod interceptors;
pub mod machine;
pub mod responses;

pub use machine::{greeting_text, process_turn, TurnOutcome};
