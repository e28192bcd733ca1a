//! Bus model
//!
//! A bus has a color, a fixed capacity, a boarded count, and a lifecycle
//! state machine:
//!
//! ```text
//! Waiting -> Arriving -> AtStop -> Departing -> Departed (terminal)
//! ```
//!
//! Transitions are strictly forward; the only automatic trigger is
//! AtStop -> Departing when the boarded count reaches capacity. Arrival and
//! departure motion completion signals come from an external movement
//! collaborator.
//!
//! Boarding rejections are recoverable no-ops returned as values; the
//! caller, not the bus, owns recovery.

use crate::models::passenger::PassengerColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bus lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusState {
    /// In the dispatcher's pending queue, not yet activated
    Waiting,

    /// Activated; driving to the stop (motion is external)
    Arriving,

    /// Parked at the stop; the only state in which boarding is allowed
    AtStop,

    /// Full; driving away (motion is external)
    Departing,

    /// Gone; terminal state
    Departed,
}

/// Errors for invalid bus state transitions
///
/// These indicate out-of-order lifecycle signals, not gameplay rejections.
#[derive(Debug, Error, PartialEq)]
pub enum BusError {
    #[error("invalid bus transition from {from:?} to {to:?}")]
    InvalidTransition { from: BusState, to: BusState },
}

/// Why a boarding attempt was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardRejection {
    /// Bus is not parked at the stop
    NotAtStop,

    /// Boarded count already equals capacity
    Full,

    /// Passenger color does not match the bus color
    ColorMismatch,
}

/// Result of a boarding attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOutcome {
    /// Passenger boarded; `now_full` is true when this boarding reached
    /// capacity and the bus is ready to depart
    Boarded { now_full: bool },

    /// Boarding refused; the bus state is unchanged
    Rejected(BoardRejection),
}

/// A colored bus with fixed capacity
///
/// # Example
/// ```
/// use busjam_core_rs::{Bus, BusState, BoardOutcome, PassengerColor};
///
/// let mut bus = Bus::new(PassengerColor::Red, 2);
/// bus.begin_arrival().unwrap();
/// bus.complete_arrival().unwrap();
///
/// assert!(bus.can_board(PassengerColor::Red));
/// assert_eq!(bus.board(PassengerColor::Red), BoardOutcome::Boarded { now_full: false });
/// assert_eq!(bus.board(PassengerColor::Red), BoardOutcome::Boarded { now_full: true });
/// assert_eq!(bus.state(), BusState::AtStop);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bus {
    /// Unique bus identifier (UUID)
    id: String,

    /// Rider color this bus accepts
    color: PassengerColor,

    /// Maximum number of riders
    capacity: usize,

    /// Riders boarded so far (monotonic, <= capacity)
    boarded: usize,

    /// Lifecycle state
    state: BusState,
}

impl Bus {
    /// Create a new waiting bus
    ///
    /// # Panics
    /// Panics if `capacity` is zero; level validation rejects that earlier.
    pub fn new(color: PassengerColor, capacity: usize) -> Self {
        assert!(capacity > 0, "bus capacity must be positive");
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            color,
            capacity,
            boarded: 0,
            state: BusState::Waiting,
        }
    }

    /// Get bus ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get bus color
    pub fn color(&self) -> PassengerColor {
        self.color
    }

    /// Get capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get boarded count
    pub fn boarded(&self) -> usize {
        self.boarded
    }

    /// Get lifecycle state
    pub fn state(&self) -> BusState {
        self.state
    }

    /// Check if boarded count has reached capacity
    pub fn is_full(&self) -> bool {
        self.boarded >= self.capacity
    }

    /// Check if the bus is in a terminal state
    pub fn is_departed(&self) -> bool {
        self.state == BusState::Departed
    }

    /// Check whether a rider of `color` may board right now
    ///
    /// True iff the bus is at the stop, not full, and the color matches.
    pub fn can_board(&self, color: PassengerColor) -> bool {
        self.state == BusState::AtStop && !self.is_full() && color == self.color
    }

    /// Attempt to board one rider of `color`
    ///
    /// On success the boarded count increments; `now_full` signals the
    /// AtStop -> Departing trigger to the dispatcher. On rejection nothing
    /// changes and the reason is returned to the caller.
    pub fn board(&mut self, color: PassengerColor) -> BoardOutcome {
        if self.state != BusState::AtStop {
            return BoardOutcome::Rejected(BoardRejection::NotAtStop);
        }
        if self.is_full() {
            return BoardOutcome::Rejected(BoardRejection::Full);
        }
        if color != self.color {
            return BoardOutcome::Rejected(BoardRejection::ColorMismatch);
        }

        self.boarded += 1;
        BoardOutcome::Boarded {
            now_full: self.is_full(),
        }
    }

    /// Waiting -> Arriving (dispatcher activation)
    pub fn begin_arrival(&mut self) -> Result<(), BusError> {
        self.transition(BusState::Waiting, BusState::Arriving)
    }

    /// Arriving -> AtStop (arrival-motion completion signal)
    pub fn complete_arrival(&mut self) -> Result<(), BusError> {
        self.transition(BusState::Arriving, BusState::AtStop)
    }

    /// AtStop -> Departing (boarded count reached capacity)
    pub fn begin_departure(&mut self) -> Result<(), BusError> {
        self.transition(BusState::AtStop, BusState::Departing)
    }

    /// Departing -> Departed (departure-motion completion signal)
    pub fn complete_departure(&mut self) -> Result<(), BusError> {
        self.transition(BusState::Departing, BusState::Departed)
    }

    fn transition(&mut self, from: BusState, to: BusState) -> Result<(), BusError> {
        if self.state != from {
            return Err(BusError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
