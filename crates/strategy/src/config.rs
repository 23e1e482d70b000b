use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use common::{Error, Result};

use crate::variables::VariableValue;
use crate::Strategy;

/// Per-strategy variable overrides (TOML).
///
/// Example `config/variables.toml`:
/// ```toml
/// [variables.equity_hotspot]
/// variable_basic_points = 20
/// variable_significance_threshold = 2.58
///
/// [variables.time_decay_linear]
/// variable_decay_window_minutes = 4320.0
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VariableFileConfig {
    #[serde(default)]
    pub variables: BTreeMap<String, BTreeMap<String, VariableValue>>,
}

impl VariableFileConfig {
    /// Load from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("failed to parse variable overrides at '{path}': {e}"))
        })
    }

    /// Apply this file's overrides to a live strategy. Unknown variable
    /// names are ignored per the contract; returns the names applied.
    pub fn apply(&self, strategy: &mut dyn Strategy) -> Vec<String> {
        let id = strategy.id().to_string();
        let Some(overrides) = self.variables.get(&id) else {
            return Vec::new();
        };
        let applied = strategy.set_variables(overrides.clone());
        if !applied.is_empty() {
            info!(strategy = %id, applied = ?applied, "Applied variable overrides");
        }
        applied
    }
}
