//! Resolver configuration, loadable from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scorer::ConfidenceMode;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// What to do when a predictor call returns an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Leave the predictor out of this cycle's vote.
    #[default]
    Skip,
    /// Fail the whole cycle.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Certainty measure used to pick the most confident legal prediction.
    pub confidence_mode: ConfidenceMode,
    pub predictor_failure: FailurePolicy,
    /// Query predictors on the rayon pool instead of one after another.
    pub parallel: bool,
    /// Drop predictions that match no legal move and show a piece that was
    /// not on the board before. While on, the raw consensus sum is taken
    /// over the remaining predictions only, so it can differ from the plain
    /// sum of everything the predictors returned.
    pub reject_cloned_pieces: bool,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            confidence_mode: ConfidenceMode::Linear,
            predictor_failure: FailurePolicy::Skip,
            parallel: true,
            reject_cloned_pieces: true,
        }
    }
}

impl EnsembleConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }
}
