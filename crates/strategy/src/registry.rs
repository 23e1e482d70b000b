use tracing::{info, warn};

use common::{Error, Result};

use crate::contract::ContractValidator;
use crate::decay::{HalfLifeDecayStrategy, LinearDecayStrategy};
use crate::hotspot::EquityHotspotStrategy;
use crate::Strategy;

/// Zero-argument strategy constructor. The registry never knows
/// implementation-specific parameters; an implementation that needs them is
/// simply not constructible here.
pub type StrategyFactory = fn() -> Result<Box<dyn Strategy>>;

/// One candidate source module: its file-stem slug plus the public
/// candidate types it exports, in export order.
#[derive(Clone)]
pub struct StrategyModule {
    slug: String,
    factories: Vec<StrategyFactory>,
}

impl StrategyModule {
    pub fn new(slug: impl Into<String>, factories: Vec<StrategyFactory>) -> Self {
        Self {
            slug: slug.into(),
            factories,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

/// The modules shipped with the engine. Adding a strategy means adding a
/// conformant implementation and listing its module here — no other
/// registration call exists.
pub fn builtin_modules() -> Vec<StrategyModule> {
    vec![
        StrategyModule::new("equity_hotspot", vec![|| {
            Ok(Box::new(EquityHotspotStrategy::new()?) as Box<dyn Strategy>)
        }]),
        StrategyModule::new("time_decay_linear", vec![|| {
            Ok(Box::new(LinearDecayStrategy::new()?) as Box<dyn Strategy>)
        }]),
        StrategyModule::new("time_decay_half_life", vec![|| {
            Ok(Box::new(HalfLifeDecayStrategy::new()?) as Box<dyn Strategy>)
        }]),
    ]
}

/// One surviving catalog entry: a live instance keyed by its module slug.
pub struct RegistryEntry {
    pub slug: String,
    pub strategy: Box<dyn Strategy>,
}

/// Builds the authoritative strategy snapshot from a module manifest.
/// No caching — every build re-instantiates everything.
pub struct StrategyRegistry {
    entries: Vec<RegistryEntry>,
}

impl StrategyRegistry {
    /// Discover the builtin modules.
    pub fn discover() -> Result<Self> {
        Self::from_modules(builtin_modules(), false)
    }

    /// Discover an explicit manifest.
    ///
    /// Per-module semantics are first-failure-wins: one candidate failing
    /// the contract drops the module's slug entirely and skips its
    /// remaining candidates. Instantiation and fingerprint failures are
    /// NOT contract violations — they propagate out of discovery so a
    /// deployment's startup check sees them.
    pub fn from_modules(modules: Vec<StrategyModule>, debug: bool) -> Result<Self> {
        let mut entries = Vec::new();

        'modules: for module in modules {
            let mut survivors: Vec<Box<dyn Strategy>> = Vec::new();
            for factory in &module.factories {
                let candidate = factory().map_err(|e| match e {
                    Error::Fingerprint(_) => e,
                    other => Error::Instantiation {
                        module: module.slug.clone(),
                        reason: other.to_string(),
                    },
                })?;

                if !ContractValidator::check(candidate.as_ref(), debug) {
                    warn!(
                        module = %module.slug,
                        "contract violation — module excluded from catalog"
                    );
                    continue 'modules;
                }
                survivors.push(candidate);
            }

            // The module slug is the catalog identity, so the snapshot
            // keeps the module's first validated export.
            if let Some(strategy) = survivors.into_iter().next() {
                info!(id = %module.slug, name = %strategy.name(), "Registered strategy");
                entries.push(RegistryEntry {
                    slug: module.slug,
                    strategy,
                });
            }
        }

        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, slug: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.slug == slug)
    }

    /// Consume the snapshot and hand out the live instance for `slug`.
    pub fn take(mut self, slug: &str) -> Option<Box<dyn Strategy>> {
        let idx = self.entries.iter().position(|e| e.slug == slug)?;
        Some(self.entries.swap_remove(idx).strategy)
    }
}
