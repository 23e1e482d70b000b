use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validator::{RuleDefinitionValidator, ValidationError};

/// Declarative strategy description authored outside the engine.
///
/// Deserializing one of these does NOT make it trustworthy — payloads must
/// pass [`RuleDefinitionValidator`] first; [`RuleDefinition::parse`] does
/// both in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub label: String,
    pub description: String,
    pub tags: Vec<String>,
    pub static_variables: BTreeMap<String, Value>,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub description: String,
    /// Condition expressions; each must reference a whitelisted variable.
    pub conditions: Vec<String>,
    pub reward: RuleReward,
    /// Ordering hint; lower fires first.
    pub priority: i64,
}

/// A reward is either a plain expression string or a structured payload
/// whose nested strings carry the variable reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleReward {
    Expression(String),
    Structured(Value),
}

impl RuleDefinition {
    /// Validate an untrusted payload, then deserialize it. The validation
    /// error for the first offending element comes back verbatim.
    pub fn parse(payload: &Value) -> Result<Self, ValidationError> {
        RuleDefinitionValidator::validate(payload)?;
        serde_json::from_value(payload.clone())
            .map_err(|e| ValidationError::Malformed(e.to_string()))
    }
}
