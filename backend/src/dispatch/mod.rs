//! Bus dispatcher
//!
//! Owns every bus for the level, activates them strictly in the
//! level-configured order, and tracks departures. At most one bus is ever
//! non-terminal-active; the invariant holds by construction because the
//! dispatcher keeps a single active-bus reference, not a lock.
//!
//! Arrival and departure motion completion signals come from the outside
//! (the movement collaborator via the coordinator); the dispatcher only
//! advances the lifecycle state machine.

use crate::models::bus::{Bus, BusError};
use crate::models::level::BusSpec;
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

/// Dispatcher errors (out-of-order lifecycle signals)
#[derive(Debug, Error, PartialEq)]
pub enum DispatchError {
    #[error("no active bus")]
    NoActiveBus,

    #[error(transparent)]
    Bus(#[from] BusError),
}

/// What happened when the dispatcher looked for the next bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A waiting bus was activated and is now arriving
    Activated { bus_id: String },

    /// No waiting bus remains; the level-complete/exhausted check fires
    Exhausted,
}

/// Result of a completed departure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureResult {
    /// The bus that just left
    pub departed_bus_id: String,

    /// Activation outcome for the next bus
    pub next: Activation,
}

/// FIFO activator for the level's buses
///
/// # Example
/// ```
/// use busjam_core_rs::{BusDispatcher, BusSpec, BusState, PassengerColor};
///
/// let mut dispatcher = BusDispatcher::new();
/// dispatcher.spawn_for_level(&[BusSpec::with_capacity(PassengerColor::Red, 1)]);
///
/// let active = dispatcher.active_bus().unwrap();
/// assert_eq!(active.state(), BusState::Arriving);
/// assert_eq!(dispatcher.total_for_level(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BusDispatcher {
    /// All buses, indexed by ID
    buses: HashMap<String, Bus>,

    /// Bus IDs in level order (kept for presentation queries)
    level_order: Vec<String>,

    /// Waiting bus IDs, front = next to activate
    waiting: VecDeque<String>,

    /// The single non-terminal-active bus, if any
    active: Option<String>,

    /// Buses that completed departure (monotonic, <= total_for_level)
    departed_count: usize,

    /// Buses configured for the level
    total_for_level: usize,
}

impl BusDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the level's buses and activate the first one
    ///
    /// Any previous level's buses are torn down first.
    pub fn spawn_for_level(&mut self, specs: &[BusSpec]) -> Activation {
        self.clear();
        self.total_for_level = specs.len();

        for spec in specs {
            let bus = Bus::new(spec.color, spec.capacity);
            let id = bus.id().to_string();
            self.level_order.push(id.clone());
            self.waiting.push_back(id.clone());
            self.buses.insert(id, bus);
        }
        self.activate_next()
    }

    /// Activate the next waiting bus, or report exhaustion
    fn activate_next(&mut self) -> Activation {
        match self.waiting.pop_front() {
            Some(bus_id) => {
                let bus = self
                    .buses
                    .get_mut(&bus_id)
                    .expect("waiting queue holds only known buses");
                bus.begin_arrival()
                    .expect("waiting bus must accept activation");
                self.active = Some(bus_id.clone());
                Activation::Activated { bus_id }
            }
            None => {
                self.active = None;
                Activation::Exhausted
            }
        }
    }

    /// Get the active bus, if any
    pub fn active_bus(&self) -> Option<&Bus> {
        self.active.as_ref().and_then(|id| self.buses.get(id))
    }

    /// Mutable access for the coordinator's boarding path
    pub(crate) fn active_bus_mut(&mut self) -> Option<&mut Bus> {
        let id = self.active.clone()?;
        self.buses.get_mut(&id)
    }

    /// Look up any bus by ID
    pub fn bus(&self, bus_id: &str) -> Option<&Bus> {
        self.buses.get(bus_id)
    }

    /// Arrival-motion completion signal: active bus is now at the stop
    pub fn complete_arrival(&mut self) -> Result<&Bus, DispatchError> {
        let id = self.active.clone().ok_or(DispatchError::NoActiveBus)?;
        let bus = self.buses.get_mut(&id).ok_or(DispatchError::NoActiveBus)?;
        bus.complete_arrival()?;
        Ok(self.buses.get(&id).expect("bus still present"))
    }

    /// Full-bus trigger: active bus leaves the stop
    pub fn request_departure(&mut self) -> Result<(), DispatchError> {
        let bus = self.active_bus_mut().ok_or(DispatchError::NoActiveBus)?;
        bus.begin_departure()?;
        Ok(())
    }

    /// Departure-motion completion signal: count the departure and move on
    pub fn complete_departure(&mut self) -> Result<DepartureResult, DispatchError> {
        let id = self.active.clone().ok_or(DispatchError::NoActiveBus)?;
        let bus = self.buses.get_mut(&id).ok_or(DispatchError::NoActiveBus)?;
        bus.complete_departure()?;

        self.departed_count += 1;
        debug_assert!(self.departed_count <= self.total_for_level);

        let next = self.activate_next();
        Ok(DepartureResult {
            departed_bus_id: id,
            next,
        })
    }

    /// Buses that completed departure
    pub fn departed_count(&self) -> usize {
        self.departed_count
    }

    /// Buses configured for the level
    pub fn total_for_level(&self) -> usize {
        self.total_for_level
    }

    /// Check if any bus is still waiting or active
    pub fn any_bus_remaining(&self) -> bool {
        self.active.is_some() || !self.waiting.is_empty()
    }

    /// Per-bus fill levels in level order, for presentation
    pub fn fill_levels(&self) -> Vec<(String, usize, usize)> {
        self.level_order
            .iter()
            .filter_map(|id| self.buses.get(id))
            .map(|bus| (bus.id().to_string(), bus.boarded(), bus.capacity()))
            .collect()
    }

    /// Tear down all buses (level end or restart)
    pub fn clear(&mut self) {
        self.buses.clear();
        self.level_order.clear();
        self.waiting.clear();
        self.active = None;
        self.departed_count = 0;
        self.total_for_level = 0;
    }
}
