//! Event logging for replay and debugging.
//!
//! Every significant state change during a level is captured as a
//! [`GameEvent`] and appended to the [`EventLog`]. Events enable:
//! - Deterministic replay (same taps at the same ticks reproduce a level)
//! - Debugging (understand what happened and when)
//! - Presentation (HUD updates are derived from the stream)
//!
//! All events carry the tick at which they occurred; continuations that run
//! inside a tick are stamped with that tick.

use crate::coordinator::outcome::LossReason;
use crate::models::passenger::PassengerColor;

/// A single logged state change
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Passenger constructed from the level config and placed on the grid
    PassengerSpawned {
        tick: usize,
        passenger_id: String,
        color: PassengerColor,
        row: usize,
        col: usize,
    },

    /// Dispatcher activated the next waiting bus (now Arriving)
    BusActivated {
        tick: usize,
        bus_id: String,
        color: PassengerColor,
    },

    /// Active bus finished its arrival motion and is at the stop
    BusArrived { tick: usize, bus_id: String },

    /// A tap was rejected; no state changed
    SelectionRejected {
        tick: usize,
        passenger_id: String,
        reason: String,
    },

    /// A passenger's source location was freed and a move began
    TransitStarted {
        tick: usize,
        transit_id: usize,
        passenger_id: String,
        destination: String,
    },

    /// Passenger completed a move into a waiting-queue slot
    PassengerQueued {
        tick: usize,
        passenger_id: String,
        slot: usize,
    },

    /// Passenger boarded the active bus
    PassengerBoarded {
        tick: usize,
        passenger_id: String,
        bus_id: String,
        now_full: bool,
    },

    /// Passenger lost the boarding race mid-transit and left play
    PassengerDropped {
        tick: usize,
        passenger_id: String,
        bus_id: String,
    },

    /// Full bus requested departure (AtStop -> Departing)
    BusDepartureRequested { tick: usize, bus_id: String },

    /// Bus finished its departure motion (terminal)
    BusDeparted {
        tick: usize,
        bus_id: String,
        departed_count: usize,
    },

    /// Countdown reached zero (one-shot)
    TimerExpired { tick: usize },

    /// Level won
    LevelWon { tick: usize },

    /// Level lost
    LevelLost { tick: usize, reason: LossReason },
}

impl GameEvent {
    /// Tick at which the event occurred
    pub fn tick(&self) -> usize {
        match self {
            GameEvent::PassengerSpawned { tick, .. }
            | GameEvent::BusActivated { tick, .. }
            | GameEvent::BusArrived { tick, .. }
            | GameEvent::SelectionRejected { tick, .. }
            | GameEvent::TransitStarted { tick, .. }
            | GameEvent::PassengerQueued { tick, .. }
            | GameEvent::PassengerBoarded { tick, .. }
            | GameEvent::PassengerDropped { tick, .. }
            | GameEvent::BusDepartureRequested { tick, .. }
            | GameEvent::BusDeparted { tick, .. }
            | GameEvent::TimerExpired { tick }
            | GameEvent::LevelWon { tick }
            | GameEvent::LevelLost { tick, .. } => *tick,
        }
    }

    /// Short type tag for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::PassengerSpawned { .. } => "passenger_spawned",
            GameEvent::BusActivated { .. } => "bus_activated",
            GameEvent::BusArrived { .. } => "bus_arrived",
            GameEvent::SelectionRejected { .. } => "selection_rejected",
            GameEvent::TransitStarted { .. } => "transit_started",
            GameEvent::PassengerQueued { .. } => "passenger_queued",
            GameEvent::PassengerBoarded { .. } => "passenger_boarded",
            GameEvent::PassengerDropped { .. } => "passenger_dropped",
            GameEvent::BusDepartureRequested { .. } => "bus_departure_requested",
            GameEvent::BusDeparted { .. } => "bus_departed",
            GameEvent::TimerExpired { .. } => "timer_expired",
            GameEvent::LevelWon { .. } => "level_won",
            GameEvent::LevelLost { .. } => "level_lost",
        }
    }
}

/// Append-only log of all events in a level
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Get events for a specific tick
    pub fn events_at_tick(&self, tick: usize) -> Vec<&GameEvent> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_filter() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.log(GameEvent::TimerExpired { tick: 3 });
        log.log(GameEvent::BusArrived {
            tick: 3,
            bus_id: "b".to_string(),
        });
        log.log(GameEvent::LevelWon { tick: 5 });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_at_tick(3).len(), 2);
        assert_eq!(log.events_of_type("level_won").len(), 1);
        assert_eq!(log.events()[0].event_type(), "timer_expired");
    }
}
