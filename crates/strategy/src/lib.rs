pub mod catalog;
pub mod config;
pub mod contract;
pub mod decay;
pub mod fingerprint;
pub mod hotspot;
pub mod registry;
pub mod variables;

pub use catalog::{StrategyCatalog, StrategySummary};
pub use contract::{ConformanceReport, ContractValidator};
pub use fingerprint::Fingerprint;
pub use registry::{StrategyModule, StrategyRegistry};
pub use variables::{VariableSnapshot, VariableStore, VariableValue};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use common::{AwardContext, GraphFormat, Result};

/// Variable every strategy must declare: the flat award for a completion.
pub const VARIABLE_BASIC_POINTS: &str = "variable_basic_points";
/// Variable every strategy must declare: the extra award a strategy may
/// grant on top of the basic points.
pub const VARIABLE_BONUS_POINTS: &str = "variable_bonus_points";

/// All point-calculation implementations must satisfy this trait.
///
/// Conformance is re-checked at registration time by [`ContractValidator`]:
/// the trait guarantees the methods exist, the validator guarantees they
/// return usable values (non-empty identity, well-formed fingerprint,
/// required variables declared).
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Stable identity used in APIs and lookups. Defaults to the name slug,
    /// which matches the strategy's source-module slug for every shipped
    /// implementation.
    fn id(&self) -> &str {
        self.name_slug()
    }

    /// Human-readable name shown in listings.
    fn name(&self) -> &str;

    /// One-paragraph description of the award logic.
    fn description(&self) -> &str;

    /// Lowercase slug form of the name.
    fn name_slug(&self) -> &str;

    /// Free-text implementation version.
    fn version(&self) -> &str;

    /// The strategy's tunable variables.
    fn variables(&self) -> &VariableStore;

    /// Mutable access for runtime tuning. Taking `&mut self` here is what
    /// enforces the single-writer discipline: a shared instance cannot be
    /// retuned while another caller holds it.
    fn variables_mut(&mut self) -> &mut VariableStore;

    /// Content fingerprint of the point-calculation algorithm, computed
    /// once at construction. Audit records store this, not the mutable
    /// variable state.
    fn fingerprint(&self) -> &Fingerprint;

    /// Current value of one variable, or `None` if not declared.
    fn variable(&self, name: &str) -> Option<VariableValue> {
        self.variables().get(name)
    }

    /// Set one variable. Returns whether the name was declared; undeclared
    /// names are ignored, not errors.
    fn set_variable(&mut self, name: &str, value: VariableValue) -> bool {
        self.variables_mut().set(name, value)
    }

    /// Apply a batch of variable updates. Returns the subset of names that
    /// were actually applied.
    fn set_variables(&mut self, values: VariableSnapshot) -> Vec<String> {
        self.variables_mut().set_many(values)
    }

    /// Numeric value of [`VARIABLE_BASIC_POINTS`].
    fn basic_points(&self) -> f64 {
        self.variables().numeric(VARIABLE_BASIC_POINTS)
    }

    /// Numeric value of [`VARIABLE_BONUS_POINTS`].
    fn bonus_points(&self) -> f64 {
        self.variables().numeric(VARIABLE_BONUS_POINTS)
    }

    /// Calculate the point award for one completed task. The only
    /// suspend-capable entry point — callers may perform I/O around it and
    /// impose their own timeouts.
    async fn calculate_points(&self, ctx: &AwardContext) -> Result<f64>;

    /// Dry-run the award without side effects. Pure computation.
    fn simulate(&self, ctx: &AwardContext) -> Result<f64>;

    /// Renderable description of the decision logic. Strategies without a
    /// real visualization fall back to this placeholder graph.
    fn logic_graph(&self, format: GraphFormat) -> String {
        match format {
            GraphFormat::Mermaid => format!(
                "graph TD\n  ctx[\"task context\"] --> calc[\"{}\"]\n  calc --> award[\"points\"]\n",
                self.name_slug()
            ),
            GraphFormat::Dot => format!(
                "digraph {} {{ ctx -> calculate_points -> award; }}",
                self.name_slug()
            ),
        }
    }

    /// Everything a caller needs about this strategy in one payload.
    fn descriptor(&self) -> StrategyDescriptor {
        StrategyDescriptor {
            id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            name_slug: self.name_slug().to_string(),
            version: self.version().to_string(),
            variables: self.variables().snapshot(),
            hash_version: self.fingerprint().to_string(),
        }
    }
}

/// Aggregate view of a strategy: identity, variable snapshot, fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub name_slug: String,
    pub version: String,
    pub variables: VariableSnapshot,
    pub hash_version: String,
}
