//! Match coordinator
//!
//! Central logic resolving passenger-selection and bus-arrival events into
//! location transitions between the grid, the waiting queue, and the active
//! bus.
//!
//! # Event intake
//!
//! Two independent sources feed the coordinator:
//! - player taps, delivered as discrete [`MatchCoordinator::select_passenger`] calls
//! - automatic queue sweeps, run when a bus arrives at the stop
//!
//! Both run synchronously on the single-threaded tick scheduler. Each
//! handler performs its read-decide-mutate sequence without yielding, so
//! freeing a source location and reserving the destination slot is one
//! atomic decision step.
//!
//! # Asynchronous transits
//!
//! A "move" is logically asynchronous: the coordinator frees the source,
//! locks the passenger InTransit, and emits a [`MoveRequest`] for the
//! movement collaborator. The collaborator signals completion through
//! [`MatchCoordinator::complete_transit`], which runs the continuation
//! exactly once; unknown transit IDs are rejected. No transit is
//! cancellable once begun.
//!
//! A boarding that fails after transit completion (the bus filled by a
//! concurrent sweep in the meantime) drops the passenger from play rather
//! than returning them to the grid or queue; see DESIGN.md for the
//! rationale and the tests pinning this behavior.

use crate::board::{GridBoard, WaitingQueue};
use crate::coordinator::outcome::{
    LevelOutcome, LossReason, OutcomeSnapshot, WinLossEvaluator,
};
use crate::core::timer::{Countdown, CountdownStatus};
use crate::dispatch::{Activation, BusDispatcher, DispatchError};
use crate::models::bus::BoardOutcome;
use crate::models::event::{EventLog, GameEvent};
use crate::models::level::{ConfigError, LevelConfig};
use crate::models::passenger::{Passenger, PassengerColor, PassengerLocation};
use std::collections::HashMap;
use thiserror::Error;

/// Coordinator errors (misuse of the API, never gameplay rejections)
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("passenger not found: {0}")]
    PassengerNotFound(String),

    #[error("transit not found: {0} (completions are exactly-once)")]
    TransitNotFound(usize),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Where a pending move is headed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitDestination {
    /// Boarding the bus that was active when the move began
    ActiveBus { bus_id: String },

    /// Parking in a reserved waiting-queue slot
    QueueSlot { slot: usize },
}

/// Work item for the movement collaborator
///
/// The coordinator never computes trajectories; it emits requests and
/// awaits [`MatchCoordinator::complete_transit`] with the same ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub transit_id: usize,
    pub passenger_id: String,
    pub destination: TransitDestination,
}

/// Why a tap was rejected (recoverable no-ops; nothing moved)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRejection {
    /// Passenger is locked by an in-flight move
    InTransit,

    /// Passenger already left play
    AlreadyRemoved,

    /// An occupied cell lies between the passenger and the front edge
    PathBlocked,

    /// Passenger is already parked and the active bus cannot take them
    AlreadyQueued,

    /// No empty waiting slot to displace into
    QueueFull,
}

impl SelectionRejection {
    fn as_str(self) -> &'static str {
        match self {
            SelectionRejection::InTransit => "in_transit",
            SelectionRejection::AlreadyRemoved => "already_removed",
            SelectionRejection::PathBlocked => "path_blocked",
            SelectionRejection::AlreadyQueued => "already_queued",
            SelectionRejection::QueueFull => "queue_full",
        }
    }
}

/// Result of a passenger-selected event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Source freed; move toward the active bus requested
    MovingToBus { transit_id: usize },

    /// Source freed; slot reserved; move toward the queue requested
    MovingToQueue { transit_id: usize, slot: usize },

    /// Nothing changed
    Rejected(SelectionRejection),
}

/// Result of a transit-completion continuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitOutcome {
    /// Passenger boarded and left play
    Boarded { now_full: bool },

    /// Bus filled during the transit; passenger dropped from play
    Dropped,

    /// Passenger parked in the reserved slot
    Parked { slot: usize },

    /// Passenger reached the slot, was immediately eligible for the
    /// (possibly different) active bus, and is moving again
    Chained { transit_id: usize },
}

/// Result of one frame tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Tick that just ran
    pub tick: usize,

    /// Countdown ticks remaining
    pub remaining_ticks: usize,

    /// Terminal outcome, if this tick ended the level
    pub outcome: Option<LevelOutcome>,
}

/// Orchestrates grid, queue, dispatcher, and countdown for one level
///
/// Constructed with explicit references to its collaborators (no ambient
/// globals); all entities are built from the [`LevelConfig`] at start and
/// torn down at level end.
pub struct MatchCoordinator {
    grid: GridBoard,
    queue: WaitingQueue,
    dispatcher: BusDispatcher,

    /// All passengers, indexed by ID
    passengers: HashMap<String, Passenger>,

    /// Spawn order, for deterministic presentation listings
    spawn_order: Vec<String>,

    /// Moves awaiting their completion signal
    pending: Vec<MoveRequest>,

    /// Counter for unique transit IDs
    next_transit_id: usize,

    countdown: Countdown,

    /// Ticks elapsed since level start (event timestamps)
    elapsed: usize,

    events: EventLog,

    /// Set once when the level reaches a terminal outcome
    outcome: Option<LevelOutcome>,
}

impl MatchCoordinator {
    /// Build a level from its validated config
    ///
    /// The color list is mapped row-major onto the grid, stopping at
    /// min(list length, width * height); extra cells or colors are ignored.
    pub fn new(config: &LevelConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut grid = GridBoard::new(config.grid_width, config.grid_height);
        let mut passengers = HashMap::new();
        let mut spawn_order = Vec::new();
        let mut events = EventLog::new();

        let count = config.passenger_count();
        for (i, &color) in config.passenger_colors.iter().take(count).enumerate() {
            let row = i / config.grid_width;
            let col = i % config.grid_width;
            let passenger = Passenger::new(color, row, col);
            let id = passenger.id().to_string();
            grid.place(id.clone(), row, col)
                .expect("row-major fill never collides");
            events.log(GameEvent::PassengerSpawned {
                tick: 0,
                passenger_id: id.clone(),
                color,
                row,
                col,
            });
            spawn_order.push(id.clone());
            passengers.insert(id, passenger);
        }

        let mut dispatcher = BusDispatcher::new();
        if let Activation::Activated { bus_id } = dispatcher.spawn_for_level(&config.buses) {
            let color = dispatcher
                .bus(&bus_id)
                .expect("activated bus exists")
                .color();
            events.log(GameEvent::BusActivated {
                tick: 0,
                bus_id,
                color,
            });
        }

        Ok(Self {
            grid,
            queue: WaitingQueue::new(config.queue_capacity),
            dispatcher,
            passengers,
            spawn_order,
            pending: Vec::new(),
            next_transit_id: 1,
            countdown: Countdown::new(config.timer_ticks),
            elapsed: 0,
            events,
            outcome: None,
        })
    }

    /// Build a level with a restored countdown (save/resume path)
    ///
    /// The layout is always re-derived fresh from the config; only the
    /// remaining time carries over.
    pub fn resume(config: &LevelConfig, remaining_ticks: usize) -> Result<Self, ConfigError> {
        let mut coordinator = Self::new(config)?;
        coordinator.countdown = Countdown::new(remaining_ticks);
        Ok(coordinator)
    }

    // ========================================================================
    // Event handlers
    // ========================================================================

    /// Handle a passenger-tapped event
    ///
    /// Resolves the passenger's location, checks path and bus eligibility,
    /// and either starts a move (to the bus, or to a reserved queue slot)
    /// or rejects the tap without touching any state.
    pub fn select_passenger(&mut self, passenger_id: &str) -> Result<SelectOutcome, GameError> {
        let passenger = self
            .passengers
            .get(passenger_id)
            .ok_or_else(|| GameError::PassengerNotFound(passenger_id.to_string()))?;
        let color = passenger.color();
        let location = passenger.location();

        match location {
            PassengerLocation::InTransit => {
                return Ok(self.reject(passenger_id, SelectionRejection::InTransit));
            }
            PassengerLocation::Removed => {
                return Ok(self.reject(passenger_id, SelectionRejection::AlreadyRemoved));
            }
            PassengerLocation::GridCell { row, col } => {
                if !self.grid.is_path_clear(row, col) {
                    return Ok(self.reject(passenger_id, SelectionRejection::PathBlocked));
                }
            }
            PassengerLocation::QueueSlot(_) => {}
        }

        if let Some(bus_id) = self.eligible_bus(color) {
            // Free the source immediately so it is available for others
            // before this move completes.
            match location {
                PassengerLocation::GridCell { .. } => {
                    self.grid.remove(passenger_id);
                }
                PassengerLocation::QueueSlot(_) => {
                    self.queue.remove(passenger_id);
                }
                _ => unreachable!("resolved above"),
            }
            let transit_id = self.begin_transit(
                passenger_id,
                TransitDestination::ActiveBus { bus_id },
            );
            return Ok(SelectOutcome::MovingToBus { transit_id });
        }

        match location {
            PassengerLocation::QueueSlot(_) => {
                Ok(self.reject(passenger_id, SelectionRejection::AlreadyQueued))
            }
            PassengerLocation::GridCell { .. } => {
                let Some(slot) = self.queue.find_empty_slot() else {
                    return Ok(self.reject(passenger_id, SelectionRejection::QueueFull));
                };
                // Atomic decision step: free the cell and reserve the slot
                // in the same handler, so no other passenger can claim
                // either while this move is in flight.
                self.grid.remove(passenger_id);
                self.queue
                    .enqueue(passenger_id.to_string(), slot)
                    .expect("find_empty_slot returned an empty slot");
                let transit_id =
                    self.begin_transit(passenger_id, TransitDestination::QueueSlot { slot });
                Ok(SelectOutcome::MovingToQueue { transit_id, slot })
            }
            _ => unreachable!("resolved above"),
        }
    }

    /// Handle a motion-finished signal for a pending transit
    ///
    /// Runs the continuation exactly once; a second completion for the same
    /// ID is an error. Bus destinations attempt boarding (a lost race drops
    /// the passenger); queue destinations park and then re-evaluate
    /// eligibility against the current active bus.
    pub fn complete_transit(&mut self, transit_id: usize) -> Result<TransitOutcome, GameError> {
        let index = self
            .pending
            .iter()
            .position(|req| req.transit_id == transit_id)
            .ok_or(GameError::TransitNotFound(transit_id))?;
        let request = self.pending.swap_remove(index);

        let color = self
            .passengers
            .get(&request.passenger_id)
            .ok_or_else(|| GameError::PassengerNotFound(request.passenger_id.clone()))?
            .color();
        debug_assert!(
            self.passengers[&request.passenger_id].is_in_transit(),
            "pending transit implies InTransit lock"
        );

        match request.destination {
            TransitDestination::ActiveBus { bus_id } => {
                self.finish_bus_transit(&request.passenger_id, &bus_id, color)
            }
            TransitDestination::QueueSlot { slot } => {
                self.finish_queue_transit(&request.passenger_id, slot, color)
            }
        }
    }

    /// Handle the active bus's arrival-motion completion
    ///
    /// Moves the bus to the stop, then sweeps queue slots in index order:
    /// every occupied, non-in-transit slot whose color matches starts a
    /// board transit, until the remaining seats are spoken for. Transits
    /// already in flight are not counted, so a tap racing the sweep can
    /// still lose and be dropped on completion.
    pub fn complete_bus_arrival(&mut self) -> Result<(), GameError> {
        let bus = self.dispatcher.complete_arrival()?;
        let bus_id = bus.id().to_string();
        let bus_color = bus.color();
        let mut free_seats = bus.capacity() - bus.boarded();

        self.events.log(GameEvent::BusArrived {
            tick: self.elapsed,
            bus_id: bus_id.clone(),
        });

        let candidates: Vec<String> = self
            .queue
            .occupants()
            .filter(|(slot, id)| {
                self.passengers
                    .get(*id)
                    .is_some_and(|p| {
                        p.color() == bus_color
                            && p.location() == PassengerLocation::QueueSlot(*slot)
                    })
            })
            .map(|(_, id)| id.to_string())
            .collect();

        for passenger_id in candidates {
            if free_seats == 0 {
                break;
            }
            free_seats -= 1;
            self.queue.remove(&passenger_id);
            self.begin_transit(
                &passenger_id,
                TransitDestination::ActiveBus {
                    bus_id: bus_id.clone(),
                },
            );
        }
        Ok(())
    }

    /// Handle the active bus's departure-motion completion
    ///
    /// Counts the departure, activates the next waiting bus (or reports
    /// exhaustion), and evaluates the terminal outcome.
    pub fn complete_bus_departure(&mut self) -> Result<Option<LevelOutcome>, GameError> {
        let result = self.dispatcher.complete_departure()?;
        self.events.log(GameEvent::BusDeparted {
            tick: self.elapsed,
            bus_id: result.departed_bus_id,
            departed_count: self.dispatcher.departed_count(),
        });

        if let Activation::Activated { bus_id } = result.next {
            let color = self
                .dispatcher
                .bus(&bus_id)
                .expect("activated bus exists")
                .color();
            self.events.log(GameEvent::BusActivated {
                tick: self.elapsed,
                bus_id,
                color,
            });
        }

        let outcome = WinLossEvaluator::evaluate(&self.snapshot());
        if let Some(outcome) = outcome {
            self.finish_level(outcome);
        }
        Ok(outcome)
    }

    /// Advance one frame tick
    ///
    /// Decrements the countdown; expiry is edge-triggered exactly once and
    /// ends the level (win checked first, otherwise a timeout loss).
    pub fn tick(&mut self) -> TickResult {
        if self.outcome.is_some() {
            return TickResult {
                tick: self.elapsed,
                remaining_ticks: self.countdown.remaining(),
                outcome: self.outcome,
            };
        }

        self.elapsed += 1;
        if self.countdown.tick() == CountdownStatus::JustExpired {
            self.events.log(GameEvent::TimerExpired { tick: self.elapsed });
            // Win before loss: a level cleared on the expiry tick stays won.
            let outcome = match WinLossEvaluator::evaluate(&self.snapshot()) {
                Some(LevelOutcome::Win) => LevelOutcome::Win,
                _ => LevelOutcome::Loss(LossReason::TimedOut),
            };
            self.finish_level(outcome);
        }

        TickResult {
            tick: self.elapsed,
            remaining_ticks: self.countdown.remaining(),
            outcome: self.outcome,
        }
    }

    // ========================================================================
    // Continuation internals
    // ========================================================================

    fn finish_bus_transit(
        &mut self,
        passenger_id: &str,
        bus_id: &str,
        color: PassengerColor,
    ) -> Result<TransitOutcome, GameError> {
        // The recorded bus may have filled, departed, or been replaced
        // while this passenger was walking.
        let board = match self.dispatcher.active_bus_mut() {
            Some(bus) if bus.id() == bus_id => bus.board(color),
            _ => BoardOutcome::Rejected(crate::models::bus::BoardRejection::NotAtStop),
        };

        match board {
            BoardOutcome::Boarded { now_full } => {
                self.set_location(passenger_id, PassengerLocation::Removed);
                self.events.log(GameEvent::PassengerBoarded {
                    tick: self.elapsed,
                    passenger_id: passenger_id.to_string(),
                    bus_id: bus_id.to_string(),
                    now_full,
                });
                if now_full {
                    self.dispatcher.request_departure()?;
                    self.events.log(GameEvent::BusDepartureRequested {
                        tick: self.elapsed,
                        bus_id: bus_id.to_string(),
                    });
                }
                Ok(TransitOutcome::Boarded { now_full })
            }
            BoardOutcome::Rejected(_) => {
                // Lost the race; the passenger is not returned to the grid
                // or queue.
                self.set_location(passenger_id, PassengerLocation::Removed);
                self.events.log(GameEvent::PassengerDropped {
                    tick: self.elapsed,
                    passenger_id: passenger_id.to_string(),
                    bus_id: bus_id.to_string(),
                });
                Ok(TransitOutcome::Dropped)
            }
        }
    }

    fn finish_queue_transit(
        &mut self,
        passenger_id: &str,
        slot: usize,
        color: PassengerColor,
    ) -> Result<TransitOutcome, GameError> {
        debug_assert_eq!(
            self.queue.occupant(slot),
            Some(passenger_id),
            "slot reservation must survive the transit"
        );
        self.set_location(passenger_id, PassengerLocation::QueueSlot(slot));
        self.events.log(GameEvent::PassengerQueued {
            tick: self.elapsed,
            passenger_id: passenger_id.to_string(),
            slot,
        });

        // Re-evaluate against the (possibly now different) active bus; an
        // eligible passenger moves on immediately instead of parking.
        if let Some(bus_id) = self.eligible_bus(color) {
            self.queue.remove(passenger_id);
            let transit_id =
                self.begin_transit(passenger_id, TransitDestination::ActiveBus { bus_id });
            return Ok(TransitOutcome::Chained { transit_id });
        }
        Ok(TransitOutcome::Parked { slot })
    }

    /// The active bus's ID when it is at the stop and can take `color`
    fn eligible_bus(&self, color: PassengerColor) -> Option<String> {
        self.dispatcher
            .active_bus()
            .filter(|bus| bus.can_board(color))
            .map(|bus| bus.id().to_string())
    }

    fn begin_transit(&mut self, passenger_id: &str, destination: TransitDestination) -> usize {
        let transit_id = self.next_transit_id;
        self.next_transit_id += 1;

        self.set_location(passenger_id, PassengerLocation::InTransit);
        let request = MoveRequest {
            transit_id,
            passenger_id: passenger_id.to_string(),
            destination: destination.clone(),
        };
        self.events.log(GameEvent::TransitStarted {
            tick: self.elapsed,
            transit_id,
            passenger_id: passenger_id.to_string(),
            destination: match destination {
                TransitDestination::ActiveBus { .. } => "bus".to_string(),
                TransitDestination::QueueSlot { slot } => format!("queue_slot_{slot}"),
            },
        });
        self.pending.push(request);
        transit_id
    }

    fn set_location(&mut self, passenger_id: &str, location: PassengerLocation) {
        if let Some(passenger) = self.passengers.get_mut(passenger_id) {
            passenger.set_location(location);
        }
    }

    fn reject(&mut self, passenger_id: &str, rejection: SelectionRejection) -> SelectOutcome {
        self.events.log(GameEvent::SelectionRejected {
            tick: self.elapsed,
            passenger_id: passenger_id.to_string(),
            reason: rejection.as_str().to_string(),
        });
        SelectOutcome::Rejected(rejection)
    }

    fn snapshot(&self) -> OutcomeSnapshot {
        OutcomeSnapshot {
            active_passengers: self.active_passenger_count(),
            queue_empty: self.queue.is_empty(),
            departed_buses: self.dispatcher.departed_count(),
            total_buses: self.dispatcher.total_for_level(),
            bus_remaining: self.dispatcher.any_bus_remaining(),
        }
    }

    fn finish_level(&mut self, outcome: LevelOutcome) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        match outcome {
            LevelOutcome::Win => self.events.log(GameEvent::LevelWon { tick: self.elapsed }),
            LevelOutcome::Loss(reason) => self.events.log(GameEvent::LevelLost {
                tick: self.elapsed,
                reason,
            }),
        }
    }

    // ========================================================================
    // Queries (presentation / collaborators)
    // ========================================================================

    /// Countdown ticks remaining
    pub fn remaining_ticks(&self) -> usize {
        self.countdown.remaining()
    }

    /// Ticks elapsed since level start
    pub fn elapsed_ticks(&self) -> usize {
        self.elapsed
    }

    /// Passengers not yet removed from play
    pub fn active_passenger_count(&self) -> usize {
        self.passengers.values().filter(|p| p.is_active()).count()
    }

    /// Terminal outcome once the level ended
    pub fn outcome(&self) -> Option<LevelOutcome> {
        self.outcome
    }

    /// Look up a passenger
    pub fn passenger(&self, passenger_id: &str) -> Option<&Passenger> {
        self.passengers.get(passenger_id)
    }

    /// All passengers in spawn order
    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.spawn_order
            .iter()
            .filter_map(|id| self.passengers.get(id))
    }

    /// Moves awaiting their completion signal (the movement collaborator's
    /// work list; completion order is up to the collaborator)
    pub fn pending_transits(&self) -> &[MoveRequest] {
        &self.pending
    }

    /// Grid occupancy
    pub fn grid(&self) -> &GridBoard {
        &self.grid
    }

    /// Per-slot queue occupancy
    pub fn queue(&self) -> &WaitingQueue {
        &self.queue
    }

    /// Bus dispatcher (active bus, fill levels, departure counts)
    pub fn dispatcher(&self) -> &BusDispatcher {
        &self.dispatcher
    }

    /// The level's event log
    pub fn event_log(&self) -> &EventLog {
        &self.events
    }

    /// Tear down all entities (level end or restart)
    pub fn teardown(&mut self) {
        self.grid.clear();
        self.queue.clear();
        self.dispatcher.clear();
        self.passengers.clear();
        self.spawn_order.clear();
        self.pending.clear();
    }
}
