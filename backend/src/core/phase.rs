//! Game phase machine
//!
//! Tracks the outer session phase (menu, playing, win screen, fail screen)
//! and records every transition so presentation can react to the stream
//! instead of polling. Re-entering the current phase is a no-op.

use serde::{Deserialize, Serialize};

/// Outer session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-game / between levels
    Menu,

    /// A level is live
    Playing,

    /// Last level ended in a win
    Complete,

    /// Last level ended in a loss
    Fail,
}

/// Phase holder with a transition history
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    current: GamePhase,
    transitions: Vec<GamePhase>,
}

impl PhaseMachine {
    /// Start in the menu
    pub fn new() -> Self {
        Self {
            current: GamePhase::Menu,
            transitions: Vec::new(),
        }
    }

    /// Current phase
    pub fn current(&self) -> GamePhase {
        self.current
    }

    /// Change phase; same-phase changes are ignored
    ///
    /// Returns true when a transition actually happened.
    pub fn change(&mut self, phase: GamePhase) -> bool {
        if self.current == phase {
            return false;
        }
        self.current = phase;
        self.transitions.push(phase);
        true
    }

    /// All transitions since construction, oldest first
    pub fn transitions(&self) -> &[GamePhase] {
        &self.transitions
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_menu() {
        let machine = PhaseMachine::new();
        assert_eq!(machine.current(), GamePhase::Menu);
        assert!(machine.transitions().is_empty());
    }

    #[test]
    fn test_same_phase_is_ignored() {
        let mut machine = PhaseMachine::new();
        assert!(!machine.change(GamePhase::Menu));
        assert!(machine.transitions().is_empty());
    }

    #[test]
    fn test_transitions_are_recorded() {
        let mut machine = PhaseMachine::new();
        assert!(machine.change(GamePhase::Playing));
        assert!(machine.change(GamePhase::Fail));
        assert!(machine.change(GamePhase::Menu));
        assert_eq!(
            machine.transitions(),
            &[GamePhase::Playing, GamePhase::Fail, GamePhase::Menu]
        );
    }
}
