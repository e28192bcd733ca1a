//! Core primitives: the level countdown and the outer phase machine.

pub mod phase;
pub mod timer;

pub use phase::{GamePhase, PhaseMachine};
pub use timer::{Countdown, CountdownStatus};
