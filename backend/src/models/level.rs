//! Level configuration
//!
//! A level is fully described by its grid dimensions, an ordered passenger
//! color list (mapped row-major onto the grid), an ordered bus list, the
//! waiting-queue capacity, and the countdown duration in ticks.
//!
//! All entities are constructed from this config at level start and torn
//! down at level end; nothing survives across levels. Configuration failure
//! is fatal to level start (the session falls back to the menu).

use crate::models::passenger::PassengerColor;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Default number of waiting-queue slots
pub const DEFAULT_QUEUE_CAPACITY: usize = 6;

/// Default bus capacity
pub const DEFAULT_BUS_CAPACITY: usize = 3;

/// Level configuration errors (fatal to level start)
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("level has no buses")]
    NoBuses,

    #[error("bus {index} has zero capacity")]
    ZeroBusCapacity { index: usize },

    #[error("queue capacity must be positive")]
    ZeroQueueCapacity,

    #[error("timer duration must be positive")]
    ZeroTimer,

    #[error("level serialization failed: {0}")]
    Serialization(String),
}

/// One bus in the level's ordered bus list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusSpec {
    pub color: PassengerColor,

    #[serde(default = "default_bus_capacity")]
    pub capacity: usize,
}

fn default_bus_capacity() -> usize {
    DEFAULT_BUS_CAPACITY
}

impl BusSpec {
    pub fn new(color: PassengerColor) -> Self {
        Self {
            color,
            capacity: DEFAULT_BUS_CAPACITY,
        }
    }

    pub fn with_capacity(color: PassengerColor, capacity: usize) -> Self {
        Self { color, capacity }
    }
}

/// Complete description of one level
///
/// # Example
/// ```
/// use busjam_core_rs::{BusSpec, LevelConfig, PassengerColor};
///
/// let config = LevelConfig {
///     grid_width: 2,
///     grid_height: 1,
///     passenger_colors: vec![PassengerColor::Red, PassengerColor::Blue],
///     buses: vec![BusSpec::with_capacity(PassengerColor::Red, 1)],
///     queue_capacity: 6,
///     timer_ticks: 300,
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Grid width (columns)
    pub grid_width: usize,

    /// Grid height (rows); row 0 is the front edge
    pub grid_height: usize,

    /// Ordered color list, mapped row-major onto cells and truncated to
    /// min(list length, width * height); extra cells or colors are ignored
    pub passenger_colors: Vec<PassengerColor>,

    /// Ordered bus list; buses are activated strictly in this order
    pub buses: Vec<BusSpec>,

    /// Number of fixed waiting-queue slots
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Countdown duration in ticks
    pub timer_ticks: usize,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

impl LevelConfig {
    /// Validate the configuration
    ///
    /// Degenerate grids (zero area, or a color list longer than the grid)
    /// are allowed; the extra entries are simply ignored at spawn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buses.is_empty() {
            return Err(ConfigError::NoBuses);
        }
        for (index, bus) in self.buses.iter().enumerate() {
            if bus.capacity == 0 {
                return Err(ConfigError::ZeroBusCapacity { index });
            }
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.timer_ticks == 0 {
            return Err(ConfigError::ZeroTimer);
        }
        Ok(())
    }

    /// Number of passengers this level actually spawns
    pub fn passenger_count(&self) -> usize {
        self.passenger_colors
            .len()
            .min(self.grid_width * self.grid_height)
    }

    /// SHA256 hash of the canonical JSON encoding
    ///
    /// Save data records this hash so a resume can detect that the level
    /// set changed since the save was written.
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        let json = serde_json::to_string(self)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}
