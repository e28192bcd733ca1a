//! Bus Jam Core - Matching Engine
//!
//! Deterministic matching and orchestration engine for a tile/queue
//! boarding puzzle: colored passengers occupy a grid and a bounded waiting
//! line; colored buses arrive one at a time and accept only matching-color
//! riders up to a fixed capacity; the level is won when every passenger
//! boards before the buses run out or the countdown expires.
//!
//! # Architecture
//!
//! - **core**: countdown timer and outer phase machine
//! - **models**: domain types (Passenger, Bus, LevelConfig, events)
//! - **board**: grid occupancy and the fixed waiting queue
//! - **dispatch**: FIFO bus activation and departure tracking
//! - **coordinator**: the match engine and win/loss evaluation
//! - **session**: level list, phase transitions, save/resume
//!
//! # Critical Invariants
//!
//! 1. Every passenger is in exactly one of {grid cell, queue slot,
//!    in-transit, removed} at any instant
//! 2. At most one occupant per cell/slot
//! 3. At most one bus is non-terminal-active at a time
//! 4. Bus state transitions are strictly forward; Departed is terminal
//! 5. Transit completions run exactly once; an InTransit passenger rejects
//!    re-selection until its continuation runs
//!
//! Everything is single-threaded and tick-driven: all state mutation
//! happens synchronously inside event handlers, so no locking is needed.
//! Motion, rendering, and input hit-testing live outside the crate; the
//! engine consumes discrete tapped/arrived/departed signals and emits
//! [`MoveRequest`] work items for the movement collaborator.

// Module declarations
pub mod board;
pub mod coordinator;
pub mod core;
pub mod dispatch;
pub mod models;
pub mod session;

// Re-exports for convenience
pub use board::{GridBoard, GridError, QueueError, WaitingQueue};
pub use coordinator::{
    GameError, LevelOutcome, LossReason, MatchCoordinator, MoveRequest, OutcomeSnapshot,
    SelectOutcome, SelectionRejection, TickResult, TransitDestination, TransitOutcome,
    WinLossEvaluator,
};
pub use self::core::{Countdown, CountdownStatus, GamePhase, PhaseMachine};
pub use dispatch::{Activation, BusDispatcher, DepartureResult, DispatchError};
pub use models::{
    BoardOutcome, BoardRejection, Bus, BusError, BusSpec, BusState, ConfigError, EventLog,
    GameEvent, LevelConfig, Passenger, PassengerColor, PassengerLocation,
};
pub use session::{GameSession, SaveData, SaveError, SessionError};
