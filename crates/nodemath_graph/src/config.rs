// SPDX-License-Identifier: MIT OR Apache-2.0
//! Evaluator settings.

use serde::{Deserialize, Serialize};

/// Tunables for [`Evaluator`](crate::evaluation::Evaluator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Most steps one root may linearize before the rest are cut off.
    ///
    /// Shared subgraphs are linearized once per path that reaches them, so
    /// stacked diamonds grow exponentially without a bound.
    pub max_steps: usize,
    /// Emit a `debug` summary after every pass
    pub log_stats: bool,
}

impl EvalConfig {
    /// Parse settings from RON, filling missing fields with defaults
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_steps: 1 << 16,
            log_stats: true,
        }
    }
}

/// Error when reading or writing settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// RON could not be parsed
    #[error("Invalid evaluator config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be written
    #[error("Failed to write evaluator config: {0}")]
    Write(#[from] ron::Error),
}
