//! Game session
//!
//! The outer layer around the match coordinator: holds the ordered level
//! list, the current level index, the phase machine, and the save/resume
//! path. One coordinator lives exactly as long as one level attempt.
//!
//! Configuration failure is fatal to level start and falls back to the
//! menu; gameplay rejections never reach this layer as errors.

pub mod save;

pub use save::{SaveData, SaveError};

use crate::coordinator::{GameError, LevelOutcome, MatchCoordinator, TickResult};
use crate::core::phase::{GamePhase, PhaseMachine};
use crate::models::level::{ConfigError, LevelConfig};
use thiserror::Error;

/// Session-level errors
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("session has no levels")]
    NoLevels,

    #[error("no level is being played")]
    NotPlaying,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Level list + phase machine + the live coordinator while playing
pub struct GameSession {
    levels: Vec<LevelConfig>,
    current_level_index: usize,
    phase: PhaseMachine,
    coordinator: Option<MatchCoordinator>,
}

impl GameSession {
    /// Create a session over an ordered, non-empty level list
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, SessionError> {
        if levels.is_empty() {
            return Err(SessionError::NoLevels);
        }
        Ok(Self {
            levels,
            current_level_index: 0,
            phase: PhaseMachine::new(),
            coordinator: None,
        })
    }

    /// Current outer phase
    pub fn phase(&self) -> GamePhase {
        self.phase.current()
    }

    /// Index of the level that is (or will next be) played
    pub fn current_level_index(&self) -> usize {
        self.current_level_index
    }

    /// Config of the current level
    pub fn current_level(&self) -> &LevelConfig {
        &self.levels[self.current_level_index]
    }

    /// The live coordinator, while a level is being played
    pub fn coordinator(&self) -> Option<&MatchCoordinator> {
        self.coordinator.as_ref()
    }

    /// Mutable coordinator access for driving gameplay events
    pub fn coordinator_mut(&mut self) -> Option<&mut MatchCoordinator> {
        self.coordinator.as_mut()
    }

    /// Start the current level fresh (full countdown)
    ///
    /// A config failure leaves the session in the menu.
    pub fn start_level(&mut self) -> Result<(), SessionError> {
        self.start_with_remaining(None)
    }

    /// Resume from saved progress
    ///
    /// Only the level index and remaining countdown are restored; the
    /// layout is always re-derived fresh from the config. A save written
    /// against a different config, or one not in progress, starts the
    /// level fresh instead.
    pub fn resume(&mut self, save: &SaveData) -> Result<(), SessionError> {
        self.current_level_index = save.level_index.min(self.levels.len() - 1);

        let hash = self.current_level().config_hash()?;
        if save.in_progress && save.matches_config_hash(&hash) {
            // Resuming with nothing on the clock still grants the expiry
            // tick, so the loss can fire normally.
            self.start_with_remaining(Some(save.remaining_ticks.max(1)))
        } else {
            self.start_with_remaining(None)
        }
    }

    fn start_with_remaining(&mut self, remaining: Option<usize>) -> Result<(), SessionError> {
        let config = &self.levels[self.current_level_index];
        let coordinator = match remaining {
            Some(ticks) => MatchCoordinator::resume(config, ticks),
            None => MatchCoordinator::new(config),
        };
        match coordinator {
            Ok(coordinator) => {
                self.coordinator = Some(coordinator);
                self.phase.change(GamePhase::Playing);
                Ok(())
            }
            Err(err) => {
                self.coordinator = None;
                self.phase.change(GamePhase::Menu);
                Err(err.into())
            }
        }
    }

    /// Advance one frame tick; ends the level when the countdown runs out
    pub fn tick(&mut self) -> Result<TickResult, SessionError> {
        self.require_playing()?;
        let result = self
            .coordinator
            .as_mut()
            .expect("playing implies a live coordinator")
            .tick();
        if let Some(outcome) = result.outcome {
            self.end_level(outcome);
        }
        Ok(result)
    }

    /// Delegate a departure-completion signal and react to the outcome
    pub fn complete_bus_departure(&mut self) -> Result<Option<LevelOutcome>, SessionError> {
        self.require_playing()?;
        let outcome = self
            .coordinator
            .as_mut()
            .expect("playing implies a live coordinator")
            .complete_bus_departure()?;
        if let Some(outcome) = outcome {
            self.end_level(outcome);
        }
        Ok(outcome)
    }

    /// Persisted progress values; only available while playing
    pub fn save_progress(&self) -> Result<SaveData, SessionError> {
        self.require_playing()?;
        let coordinator = self
            .coordinator
            .as_ref()
            .expect("playing implies a live coordinator");
        Ok(SaveData {
            level_index: self.current_level_index,
            remaining_ticks: coordinator.remaining_ticks(),
            in_progress: true,
            config_hash: self.current_level().config_hash()?,
        })
    }

    /// Abandon the current level and return to the menu
    pub fn return_to_menu(&mut self) {
        if let Some(coordinator) = &mut self.coordinator {
            coordinator.teardown();
        }
        self.coordinator = None;
        self.phase.change(GamePhase::Menu);
    }

    fn end_level(&mut self, outcome: LevelOutcome) {
        if let Some(coordinator) = &mut self.coordinator {
            coordinator.teardown();
        }
        self.coordinator = None;
        match outcome {
            LevelOutcome::Win => {
                self.phase.change(GamePhase::Complete);
                // Wrap to the first level after the last, like the level
                // service in the original game.
                self.current_level_index = (self.current_level_index + 1) % self.levels.len();
            }
            LevelOutcome::Loss(_) => {
                self.phase.change(GamePhase::Fail);
            }
        }
    }

    fn require_playing(&self) -> Result<(), SessionError> {
        if self.phase.current() != GamePhase::Playing || self.coordinator.is_none() {
            return Err(SessionError::NotPlaying);
        }
        Ok(())
    }
}
