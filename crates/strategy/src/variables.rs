use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reserved name prefix for tunable strategy variables.
pub const VARIABLE_PREFIX: &str = "variable_";

/// A variable's current value. The store does no range validation —
/// strategies validate internally where it matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Integer(i64),
    Float(f64),
    Flag(bool),
    Text(String),
}

impl VariableValue {
    /// Numeric view of the value, `None` for flags and text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            VariableValue::Integer(v) => Some(*v as f64),
            VariableValue::Float(v) => Some(*v),
            VariableValue::Flag(_) | VariableValue::Text(_) => None,
        }
    }
}

impl From<i64> for VariableValue {
    fn from(v: i64) -> Self {
        VariableValue::Integer(v)
    }
}

impl From<f64> for VariableValue {
    fn from(v: f64) -> Self {
        VariableValue::Float(v)
    }
}

impl From<bool> for VariableValue {
    fn from(v: bool) -> Self {
        VariableValue::Flag(v)
    }
}

impl From<&str> for VariableValue {
    fn from(v: &str) -> Self {
        VariableValue::Text(v.to_string())
    }
}

impl std::fmt::Display for VariableValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableValue::Integer(v) => write!(f, "{v}"),
            VariableValue::Float(v) => write!(f, "{v}"),
            VariableValue::Flag(v) => write!(f, "{v}"),
            VariableValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Immutable copy of a store's contents, taken at dispatch time.
pub type VariableSnapshot = BTreeMap<String, VariableValue>;

/// Declared-key store of a strategy's tunable variables.
///
/// Names are enumerated at construction via [`VariableStore::with`]; setting
/// an undeclared name is ignored and reported as "not applied". Key order is
/// irrelevant, keys unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableStore {
    values: VariableSnapshot,
}

impl VariableStore {
    /// Declare a variable with its default value. Panics on a name outside
    /// the reserved prefix — declarations are compiled-in, so this is a
    /// programmer error, not input validation.
    pub fn with(mut self, name: &str, value: impl Into<VariableValue>) -> Self {
        assert!(
            name.starts_with(VARIABLE_PREFIX),
            "variable names must start with '{VARIABLE_PREFIX}', got '{name}'"
        );
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<VariableValue> {
        self.values.get(name).cloned()
    }

    /// Numeric value of a variable, `0.0` when absent or non-numeric.
    pub fn numeric(&self, name: &str) -> f64 {
        self.values
            .get(name)
            .and_then(VariableValue::as_f64)
            .unwrap_or(0.0)
    }

    /// Set a declared variable. Returns whether the name existed.
    pub fn set(&mut self, name: &str, value: VariableValue) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Apply a batch of updates. Unknown names are silently ignored; the
    /// returned list names the variables actually applied.
    pub fn set_many(&mut self, values: VariableSnapshot) -> Vec<String> {
        let mut applied = Vec::new();
        for (name, value) in values {
            if self.set(&name, value) {
                applied.push(name);
            }
        }
        applied
    }

    pub fn snapshot(&self) -> VariableSnapshot {
        self.values.clone()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
