//! Engine configuration

use crate::data::Cadence;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default bound on recursion nesting for a single forecast
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 1_000;

/// Largest recursion bound a configuration may set. Basic recursion nests one
/// native frame per level, so the bound has to fit a 2 MiB thread stack.
pub const MAX_RECURSION_DEPTH: usize = 2_000;

/// Configuration shared by every forecast an engine runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest nesting of recursive activations a forecast may reach
    pub max_recursion_depth: usize,
    /// Cadence used to date forecasts; inferred from the history when unset
    pub cadence: Option<Cadence>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            cadence: None,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with a specific recursion bound
    pub fn new(max_recursion_depth: usize) -> Result<Self> {
        let config = Self {
            max_recursion_depth,
            cadence: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Date forecasts with a fixed cadence instead of inferring it
    pub fn with_cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = Some(cadence);
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Check the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_recursion_depth == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_recursion_depth must be positive".to_string(),
            ));
        }

        if self.max_recursion_depth > MAX_RECURSION_DEPTH {
            return Err(ForecastError::InvalidParameter(format!(
                "max_recursion_depth {} exceeds the limit of {}",
                self.max_recursion_depth, MAX_RECURSION_DEPTH
            )));
        }

        if let Some(cadence) = self.cadence {
            if cadence.length() == 0 {
                return Err(ForecastError::InvalidParameter(format!(
                    "cadence {:?} has zero length",
                    cadence
                )));
            }
        }

        Ok(())
    }
}
