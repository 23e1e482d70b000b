use tracing::{info, warn};

use common::GraphFormat;

use crate::{Strategy, VARIABLE_BASIC_POINTS, VARIABLE_BONUS_POINTS};

/// Capability names probed on every candidate, in diagnostic order.
const REQUIRED_CAPABILITIES: [&str; 8] = [
    "id",
    "name",
    "description",
    "name_slug",
    "version",
    "fingerprint",
    "logic_graph",
    "descriptor",
];

/// Variables every candidate must declare.
const REQUIRED_VARIABLES: [&str; 2] = [VARIABLE_BASIC_POINTS, VARIABLE_BONUS_POINTS];

/// Outcome of probing one candidate against the strategy contract.
#[derive(Debug, Clone, Default)]
pub struct ConformanceReport {
    pub missing_methods: Vec<&'static str>,
    pub missing_variables: Vec<&'static str>,
}

impl ConformanceReport {
    pub fn conformant(&self) -> bool {
        self.missing_methods.is_empty() && self.missing_variables.is_empty()
    }
}

/// Checks a candidate instance against the capability set of [`Strategy`].
///
/// The trait guarantees the methods compile; the validator guarantees they
/// return usable values. A capability counts as missing when its probe
/// yields a degenerate answer (empty identity, malformed fingerprint,
/// blank logic graph, inconsistent descriptor).
pub struct ContractValidator;

impl ContractValidator {
    /// Probe every required capability and variable; collect what's missing.
    pub fn inspect(candidate: &dyn Strategy) -> ConformanceReport {
        let mut report = ConformanceReport::default();

        for capability in REQUIRED_CAPABILITIES {
            let present = match capability {
                "id" => !candidate.id().trim().is_empty(),
                "name" => !candidate.name().trim().is_empty(),
                "description" => !candidate.description().trim().is_empty(),
                "name_slug" => is_slug(candidate.name_slug()),
                "version" => !candidate.version().trim().is_empty(),
                "fingerprint" => is_hex_digest(candidate.fingerprint().as_hex()),
                "logic_graph" => !candidate.logic_graph(GraphFormat::Mermaid).trim().is_empty(),
                "descriptor" => {
                    let d = candidate.descriptor();
                    d.id == candidate.id()
                        && d.hash_version == candidate.fingerprint().as_hex()
                        && d.variables.len() == candidate.variables().len()
                }
                _ => unreachable!("unknown capability probe"),
            };
            if !present {
                report.missing_methods.push(capability);
            }
        }

        for variable in REQUIRED_VARIABLES {
            if !candidate.variables().contains(variable) {
                report.missing_variables.push(variable);
            }
        }

        report
    }

    /// Probe the candidate and emit diagnostics to the operator channel.
    /// Variable diagnostics are only emitted when `debug` is set; either
    /// kind of miss still fails the check. Callers that need the reasons
    /// use [`ContractValidator::inspect`] directly.
    pub fn check(candidate: &dyn Strategy, debug: bool) -> bool {
        let report = Self::inspect(candidate);

        if report.missing_methods.is_empty() {
            info!(strategy = candidate.id(), "[+] All methods are present.");
        } else {
            warn!(
                strategy = candidate.id(),
                missing = ?report.missing_methods,
                "candidate is missing required methods"
            );
        }

        if debug && !report.missing_variables.is_empty() {
            warn!(
                strategy = candidate.id(),
                missing = ?report.missing_variables,
                "candidate is missing required variables"
            );
        }

        report.conformant()
    }
}

fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

fn is_hex_digest(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::Fingerprint;
    use crate::variables::VariableStore;
    use async_trait::async_trait;
    use common::{AwardContext, Result};

    struct Probe {
        name: &'static str,
        slug: &'static str,
        variables: VariableStore,
        fingerprint: Fingerprint,
    }

    impl Probe {
        fn conformant() -> Self {
            Self {
                name: "Probe",
                slug: "probe",
                variables: VariableStore::default()
                    .with(VARIABLE_BASIC_POINTS, 10)
                    .with(VARIABLE_BONUS_POINTS, 5),
                fingerprint: Fingerprint::of_algorithm("award = basic").unwrap(),
            }
        }

        fn base_like() -> Self {
            // Abstract-base shape: no name, no slug, no declared variables.
            Self {
                name: "",
                slug: "",
                variables: VariableStore::default(),
                fingerprint: Fingerprint::of_algorithm("award = basic").unwrap(),
            }
        }
    }

    #[async_trait]
    impl crate::Strategy for Probe {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "test probe"
        }
        fn name_slug(&self) -> &str {
            self.slug
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

    #[test]
    fn conformant_candidate_passes() {
        let probe = Probe::conformant();
        let report = ContractValidator::inspect(&probe);
        assert!(report.conformant(), "unexpected misses: {report:?}");
        assert!(ContractValidator::check(&probe, true));
    }

    #[test]
    fn report_names_exactly_the_missing_capabilities() {
        let probe = Probe::base_like();
        let report = ContractValidator::inspect(&probe);
        // id defaults to the slug, so an empty slug takes id down with it.
        assert_eq!(report.missing_methods, vec!["id", "name", "name_slug"]);
        assert_eq!(
            report.missing_variables,
            vec![VARIABLE_BASIC_POINTS, VARIABLE_BONUS_POINTS]
        );
        assert!(!ContractValidator::check(&probe, false));
    }

    #[test]
    fn missing_variables_fail_even_without_debug() {
        let mut probe = Probe::conformant();
        probe.variables = VariableStore::default().with(VARIABLE_BASIC_POINTS, 10);
        let report = ContractValidator::inspect(&probe);
        assert!(report.missing_methods.is_empty());
        assert_eq!(report.missing_variables, vec![VARIABLE_BONUS_POINTS]);
        assert!(!ContractValidator::check(&probe, false));
    }

    #[test]
    fn uppercase_slug_is_rejected() {
        let mut probe = Probe::conformant();
        probe.slug = "Probe";
        let report = ContractValidator::inspect(&probe);
        assert!(report.missing_methods.contains(&"name_slug"));
    }
}
