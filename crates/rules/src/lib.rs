pub mod definition;
pub mod validator;

pub use definition::{Rule, RuleDefinition, RuleReward};
pub use validator::{RuleDefinitionValidator, ValidationError, VARIABLE_TOKENS};
