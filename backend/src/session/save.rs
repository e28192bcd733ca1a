//! Save data
//!
//! Persisted progress is values only: the level index, the remaining
//! countdown, and an in-progress flag. Mid-level entity placement is never
//! serialized; a resume always re-derives a fresh layout from the level
//! config and keeps only the saved countdown.
//!
//! The save carries a SHA256 hash of the level config it was written
//! against so a resume can detect that the level set changed underneath it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Save/load errors
#[derive(Debug, Error, PartialEq)]
pub enum SaveError {
    #[error("save data is not valid JSON: {0}")]
    Malformed(String),

    #[error("save was written against a different level config")]
    ConfigMismatch,
}

/// Persisted progress values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Index into the session's level list
    pub level_index: usize,

    /// Countdown ticks left when the save was written
    pub remaining_ticks: usize,

    /// True when a level was live at save time (enables resume)
    pub in_progress: bool,

    /// SHA256 hash of the level config this save belongs to
    pub config_hash: String,
}

impl SaveData {
    /// Encode to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("save data always serializes")
    }

    /// Decode from JSON
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        serde_json::from_str(json).map_err(|e| SaveError::Malformed(e.to_string()))
    }

    /// Check the save against the config it would resume
    pub fn matches_config_hash(&self, hash: &str) -> bool {
        self.config_hash == hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let save = SaveData {
            level_index: 3,
            remaining_ticks: 42,
            in_progress: true,
            config_hash: "abc123".to_string(),
        };
        let restored = SaveData::from_json(&save.to_json()).unwrap();
        assert_eq!(restored, save);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            SaveData::from_json("not json"),
            Err(SaveError::Malformed(_))
        ));
    }

    #[test]
    fn test_hash_check() {
        let save = SaveData {
            level_index: 0,
            remaining_ticks: 10,
            in_progress: true,
            config_hash: "aaa".to_string(),
        };
        assert!(save.matches_config_hash("aaa"));
        assert!(!save.matches_config_hash("bbb"));
    }
}
