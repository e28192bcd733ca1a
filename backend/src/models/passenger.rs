//! Passenger model
//!
//! A passenger is a colored rider that starts on the grid, may be displaced
//! into the waiting queue, and ultimately boards a bus of the matching color.
//!
//! # Location Model
//!
//! A passenger occupies exactly one location at any instant:
//! - **GridCell**: standing on the board at (row, col)
//! - **QueueSlot**: parked in a fixed waiting slot
//! - **InTransit**: moving between locations; re-selection is rejected until
//!   the movement continuation runs exactly once
//! - **Removed**: boarded (or dropped) and permanently out of play

use serde::{Deserialize, Serialize};

/// Passenger (and bus) color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassengerColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
    Black,
}

/// Where a passenger currently is
///
/// Exactly one of these holds at any instant (see crate invariants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassengerLocation {
    /// Standing on the grid at (row, col); row 0 is the front edge
    GridCell { row: usize, col: usize },

    /// Parked in a fixed waiting-queue slot
    QueueSlot(usize),

    /// Moving toward a bus or a queue slot; locked against re-selection
    InTransit,

    /// Permanently out of play (boarded, or dropped after a lost race)
    Removed,
}

/// A colored rider tracked by the match coordinator
///
/// # Example
/// ```
/// use busjam_core_rs::{Passenger, PassengerColor, PassengerLocation};
///
/// let p = Passenger::new(PassengerColor::Red, 0, 2);
/// assert_eq!(p.color(), PassengerColor::Red);
/// assert_eq!(p.location(), PassengerLocation::GridCell { row: 0, col: 2 });
/// assert!(!p.is_in_transit());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    /// Unique passenger identifier (UUID)
    id: String,

    /// Fixed color, assigned from the level's color list at spawn
    color: PassengerColor,

    /// Current location
    location: PassengerLocation,
}

impl Passenger {
    /// Create a passenger standing on the grid
    ///
    /// Passengers are only ever constructed from a level config at level
    /// start; they never survive across levels.
    pub fn new(color: PassengerColor, row: usize, col: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            color,
            location: PassengerLocation::GridCell { row, col },
        }
    }

    /// Get passenger ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get passenger color
    pub fn color(&self) -> PassengerColor {
        self.color
    }

    /// Get current location
    pub fn location(&self) -> PassengerLocation {
        self.location
    }

    /// Update location
    ///
    /// The coordinator is the only caller; it pairs every location change
    /// with the matching grid/queue occupancy mutation in the same handler.
    pub(crate) fn set_location(&mut self, location: PassengerLocation) {
        self.location = location;
    }

    /// Check if the passenger is locked by an in-flight move
    pub fn is_in_transit(&self) -> bool {
        matches!(self.location, PassengerLocation::InTransit)
    }

    /// Check if the passenger is permanently out of play
    pub fn is_removed(&self) -> bool {
        matches!(self.location, PassengerLocation::Removed)
    }

    /// Check if the passenger still counts toward the win condition
    pub fn is_active(&self) -> bool {
        !self.is_removed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_passenger_starts_on_grid() {
        let p = Passenger::new(PassengerColor::Blue, 3, 1);
        assert_eq!(p.location(), PassengerLocation::GridCell { row: 3, col: 1 });
        assert!(p.is_active());
        assert!(!p.is_in_transit());
        assert!(!p.is_removed());
    }

    #[test]
    fn test_location_transitions() {
        let mut p = Passenger::new(PassengerColor::Green, 0, 0);

        p.set_location(PassengerLocation::InTransit);
        assert!(p.is_in_transit());
        assert!(p.is_active());

        p.set_location(PassengerLocation::QueueSlot(4));
        assert_eq!(p.location(), PassengerLocation::QueueSlot(4));

        p.set_location(PassengerLocation::Removed);
        assert!(p.is_removed());
        assert!(!p.is_active());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Passenger::new(PassengerColor::Red, 0, 0);
        let b = Passenger::new(PassengerColor::Red, 0, 1);
        assert_ne!(a.id(), b.id());
    }
}
