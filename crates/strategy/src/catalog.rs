use serde::{Deserialize, Serialize};

use common::{Error, Result};

use crate::registry::{builtin_modules, RegistryEntry, StrategyModule, StrategyRegistry};
use crate::variables::VariableSnapshot;
use crate::Strategy;

/// List-view of one strategy. The fingerprint is intentionally omitted —
/// callers that need it take the full descriptor from the live instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub variables: VariableSnapshot,
}

impl StrategySummary {
    fn from_entry(entry: &RegistryEntry) -> Self {
        Self {
            id: entry.slug.clone(),
            name: entry.strategy.name().to_string(),
            description: entry.strategy.description().to_string(),
            version: entry.strategy.version().to_string(),
            variables: entry.strategy.variables().snapshot(),
        }
    }
}

/// Read-only facade over the registry. Every call rebuilds the snapshot
/// from the manifest — two concurrent callers see independent instances,
/// consistent only through the strategies' compiled-in definitions.
pub struct StrategyCatalog {
    modules: Vec<StrategyModule>,
    debug: bool,
}

impl StrategyCatalog {
    /// Catalog over the builtin manifest.
    pub fn new() -> Self {
        Self::with_modules(builtin_modules(), false)
    }

    pub fn with_modules(modules: Vec<StrategyModule>, debug: bool) -> Self {
        Self { modules, debug }
    }

    fn rebuild(&self) -> Result<StrategyRegistry> {
        StrategyRegistry::from_modules(self.modules.clone(), self.debug)
    }

    /// Summaries of every available strategy.
    pub fn list_all(&self) -> Result<Vec<StrategySummary>> {
        let registry = self.rebuild()?;
        Ok(registry.iter().map(StrategySummary::from_entry).collect())
    }

    /// Summary of one strategy by id.
    pub fn get_by_id(&self, id: &str) -> Result<StrategySummary> {
        self.list_all()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::StrategyNotFound { id: id.to_string() })
    }

    /// A live instance by id, for calculation or runtime tuning.
    pub fn get_class_by_id(&self, id: &str) -> Result<Box<dyn Strategy>> {
        let registry = self.rebuild()?;
        registry
            .take(id)
            .ok_or_else(|| Error::StrategyNotFound { id: id.to_string() })
    }
}

impl Default for StrategyCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariableValue;

    #[test]
    fn list_all_summarizes_the_builtin_catalog() {
        let catalog = StrategyCatalog::new();
        let all = catalog.list_all().unwrap();
        assert_eq!(all.len(), 3);
        let hotspot = all.iter().find(|s| s.id == "equity_hotspot").unwrap();
        assert_eq!(hotspot.name, "Equity Hotspot");
        assert!(hotspot.variables.contains_key("variable_basic_points"));
    }

    #[test]
    fn get_by_id_finds_known_strategies() {
        let catalog = StrategyCatalog::new();
        let summary = catalog.get_by_id("time_decay_half_life").unwrap();
        assert_eq!(summary.version, "1.0.0");
    }

    #[test]
    fn get_by_id_surfaces_not_found_with_the_offending_id() {
        let catalog = StrategyCatalog::new();
        let err = catalog.get_by_id("no_such_strategy").unwrap_err();
        assert!(matches!(err, Error::StrategyNotFound { ref id } if id == "no_such_strategy"));
    }

    #[test]
    fn get_class_by_id_returns_a_tunable_live_instance() {
        let catalog = StrategyCatalog::new();
        let mut strategy = catalog.get_class_by_id("equity_hotspot").unwrap();
        assert!(strategy.set_variable("variable_bonus_points", VariableValue::Integer(50)));
        assert_eq!(strategy.bonus_points(), 50.0);
    }

    #[test]
    fn rebuilds_are_independent_snapshots() {
        let catalog = StrategyCatalog::new();
        let mut first = catalog.get_class_by_id("equity_hotspot").unwrap();
        first.set_variable("variable_bonus_points", VariableValue::Integer(99));
        // A fresh rebuild does not observe the tuned instance.
        let second = catalog.get_class_by_id("equity_hotspot").unwrap();
        assert_eq!(second.bonus_points(), 25.0);
    }
}
