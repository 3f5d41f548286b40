//! Session configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::Side;

/// Configuration for a self-play session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Plies after which the game is scored as it stands
    pub max_plies: usize,
    /// Side that moves first
    pub first_to_move: Side,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_plies: 128,
            first_to_move: Side::Black,
        }
    }
}

impl SessionConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = max_plies;
        self
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.max_plies, 128);
        assert_eq!(config.first_to_move, Side::Black);
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::default().with_seed(9).with_max_plies(10);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_plies, 10);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"seed": 3}"#).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.max_plies, 128);

        let config: SessionConfig = serde_json::from_str(r#"{"first_to_move": "white"}"#).unwrap();
        assert_eq!(config.first_to_move, Side::White);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = SessionConfig::load(Path::new("/nonexistent/reversi.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
