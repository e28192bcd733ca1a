//! Domain models: passengers, buses, level configuration, and events.

pub mod bus;
pub mod event;
pub mod level;
pub mod passenger;

pub use bus::{BoardOutcome, BoardRejection, Bus, BusError, BusState};
pub use event::{EventLog, GameEvent};
pub use level::{BusSpec, ConfigError, LevelConfig};
pub use passenger::{Passenger, PassengerColor, PassengerLocation};
