use serde_json::Value;
use thiserror::Error;

/// Variable references a condition or reward may cite. This whitelist is
/// the only contract between authoring tooling and the engine.
pub const VARIABLE_TOKENS: &[&str] = &[
    "$TEAM_POINTS",
    "$PERSONAL_POINTS",
    "$BASIC_POINTS",
    "$BONUS_POINTS",
    "$TASK_POINTS",
];

const REQUIRED_DEFINITION_KEYS: [&str; 5] =
    ["label", "description", "tags", "static_variables", "rules"];
const REQUIRED_RULE_KEYS: [&str; 5] = ["name", "description", "conditions", "reward", "priority"];

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("definition is missing required key '{key}'")]
    MissingKey { key: String },

    #[error("rule '{rule}' is missing required key '{key}'")]
    MissingRuleKey { rule: String, key: String },

    #[error("rule '{rule}' has a condition with no variable reference: '{condition}'")]
    UnrecognizedCondition { rule: String, condition: String },

    #[error("rule '{rule}' has a reward with no variable reference")]
    UnrecognizedReward { rule: String },

    #[error("malformed definition: {0}")]
    Malformed(String),
}

/// Static, fail-fast check of an externally authored strategy definition.
/// The first offending element aborts validation; nothing is collected.
pub struct RuleDefinitionValidator;

impl RuleDefinitionValidator {
    pub fn validate(payload: &Value) -> Result<(), ValidationError> {
        let definition = payload
            .as_object()
            .ok_or_else(|| ValidationError::Malformed("definition must be an object".into()))?;

        for key in REQUIRED_DEFINITION_KEYS {
            if !definition.contains_key(key) {
                return Err(ValidationError::MissingKey { key: key.into() });
            }
        }

        let rules = definition["rules"]
            .as_array()
            .ok_or_else(|| ValidationError::Malformed("'rules' must be an array".into()))?;

        for (index, rule) in rules.iter().enumerate() {
            Self::validate_rule(index, rule)?;
        }

        Ok(())
    }

    fn validate_rule(index: usize, rule: &Value) -> Result<(), ValidationError> {
        let fields = rule
            .as_object()
            .ok_or_else(|| ValidationError::Malformed(format!("rule #{index} must be an object")))?;

        // The name keys the remaining diagnostics; fall back to the index
        // while it is still missing or malformed.
        let label = fields
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{index}"));

        for key in REQUIRED_RULE_KEYS {
            if !fields.contains_key(key) {
                return Err(ValidationError::MissingRuleKey {
                    rule: label,
                    key: key.into(),
                });
            }
        }

        let conditions = fields["conditions"].as_array().ok_or_else(|| {
            ValidationError::Malformed(format!("rule '{label}' conditions must be an array"))
        })?;
        for condition in conditions {
            let text = condition.as_str().ok_or_else(|| {
                ValidationError::Malformed(format!("rule '{label}' conditions must be strings"))
            })?;
            if !contains_token(text) {
                return Err(ValidationError::UnrecognizedCondition {
                    rule: label,
                    condition: text.to_string(),
                });
            }
        }

        if !contains_token_deep(&fields["reward"]) {
            return Err(ValidationError::UnrecognizedReward { rule: label });
        }

        Ok(())
    }
}

fn contains_token(text: &str) -> bool {
    VARIABLE_TOKENS.iter().any(|token| text.contains(token))
}

/// Rewards may be strings or structured payloads; any nested string
/// carrying a token satisfies the check.
fn contains_token_deep(value: &Value) -> bool {
    match value {
        Value::String(text) => contains_token(text),
        Value::Array(items) => items.iter().any(contains_token_deep),
        Value::Object(fields) => fields.values().any(contains_token_deep),
        _ => false,
    }
}
