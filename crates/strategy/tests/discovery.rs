//! End-to-end discovery scenario: one module exporting a conformant
//! strategy, one module whose export fails the contract. Only the first
//! reaches the catalog, and the bad module is dropped wholesale.

use async_trait::async_trait;

use common::{AwardContext, Result};
use strategy::{
    Fingerprint, Strategy, StrategyCatalog, StrategyModule, VariableStore,
    VARIABLE_BASIC_POINTS, VARIABLE_BONUS_POINTS,
};

struct ValidStrategy {
    variables: VariableStore,
    fingerprint: Fingerprint,
}

impl ValidStrategy {
    fn boxed() -> Result<Box<dyn Strategy>> {
        Ok(Box::new(Self {
            variables: VariableStore::default()
                .with(VARIABLE_BASIC_POINTS, 10)
                .with(VARIABLE_BONUS_POINTS, 5),
            fingerprint: Fingerprint::of_algorithm("award = basic + bonus")?,
        }))
    }
}

#[async_trait]
impl Strategy for ValidStrategy {
    fn name(&self) -> &str {
        "Valid Strategy"
    }
    fn description(&self) -> &str {
        "awards a fixed number of points"
    }
    fn name_slug(&self) -> &str {
        "strategy_one"
    }
    fn version(&self) -> &str {
        "1.0.0"
    }
    fn variables(&self) -> &VariableStore {
        &self.variables
    }
    fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.variables
    }
    fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
    async fn calculate_points(&self, _ctx: &AwardContext) -> Result<f64> {
        Ok(self.basic_points() + self.bonus_points())
    }
    fn simulate(&self, _ctx: &AwardContext) -> Result<f64> {
        Ok(self.basic_points() + self.bonus_points())
    }
}

/// Abstract-base shape: identity present, required variables missing.
struct BaseLikeStrategy {
    variables: VariableStore,
    fingerprint: Fingerprint,
}

impl BaseLikeStrategy {
    fn boxed() -> Result<Box<dyn Strategy>> {
        Ok(Box::new(Self {
            variables: VariableStore::default(),
            fingerprint: Fingerprint::of_algorithm("award = ?")?,
        }))
    }
}

#[async_trait]
impl Strategy for BaseLikeStrategy {
    fn name(&self) -> &str {
        "Base Like Strategy"
    }
    fn description(&self) -> &str {
        "declares nothing"
    }
    fn name_slug(&self) -> &str {
        "strategy_two"
    }
    fn version(&self) -> &str {
        "1.0.0"
    }
    fn variables(&self) -> &VariableStore {
        &self.variables
    }
    fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.variables
    }
    fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
    async fn calculate_points(&self, _ctx: &AwardContext) -> Result<f64> {
        Ok(0.0)
    }
    fn simulate(&self, _ctx: &AwardContext) -> Result<f64> {
        Ok(0.0)
    }
}

fn scan_manifest() -> Vec<StrategyModule> {
    vec![
        StrategyModule::new("strategy_one", vec![|| ValidStrategy::boxed()]),
        StrategyModule::new("strategy_two", vec![|| BaseLikeStrategy::boxed()]),
    ]
}

#[test]
fn only_the_conformant_module_reaches_the_catalog() {
    let catalog = StrategyCatalog::with_modules(scan_manifest(), false);
    let all = catalog.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "strategy_one");
}

#[test]
fn a_conformant_sibling_does_not_save_a_failing_module() {
    // strategy_two exports a conformant type after the failing one; the
    // module is still dropped wholesale (first-failure-wins).
    let modules = vec![
        StrategyModule::new("strategy_one", vec![|| ValidStrategy::boxed()]),
        StrategyModule::new(
            "strategy_two",
            vec![|| BaseLikeStrategy::boxed(), || ValidStrategy::boxed()],
        ),
    ];
    let catalog = StrategyCatalog::with_modules(modules, false);
    let all = catalog.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "strategy_one");
}

#[tokio::test]
async fn a_discovered_strategy_calculates_points_end_to_end() {
    let catalog = StrategyCatalog::with_modules(scan_manifest(), false);
    let strategy = catalog.get_class_by_id("strategy_one").unwrap();
    let ctx = AwardContext::timed("u1", "t1", 0.0, chrono::Utc::now(), 0.0);
    assert_eq!(strategy.calculate_points(&ctx).await.unwrap(), 15.0);

    // `Box<dyn Strategy>` is not `Debug`, so `unwrap_err()` cannot be used to
    // discard the `Ok` variant; extract the error via a match instead.
    let err = match catalog.get_class_by_id("strategy_two") {
        Ok(_) => panic!("expected strategy_two lookup to fail"),
        Err(e) => e,
    };
    assert!(matches!(err, common::Error::StrategyNotFound { ref id } if id == "strategy_two"));
}
