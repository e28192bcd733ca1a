//! Match coordination: the central engine and the win/loss evaluator.

pub mod engine;
pub mod outcome;

pub use engine::{
    GameError, MatchCoordinator, MoveRequest, SelectOutcome, SelectionRejection, TickResult,
    TransitDestination, TransitOutcome,
};
pub use outcome::{LevelOutcome, LossReason, OutcomeSnapshot, WinLossEvaluator};
