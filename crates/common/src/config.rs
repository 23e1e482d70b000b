/// All configuration loaded from environment variables at startup.
/// Every knob is optional — the engine runs with built-in defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to a TOML file with per-strategy variable overrides.
    pub strategy_vars_path: Option<String>,
    /// Emit verbose contract diagnostics (missing-variable reports) during
    /// strategy discovery.
    pub contract_debug: bool,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            strategy_vars_path: optional_env("STRATEGY_VARS_PATH"),
            contract_debug: optional_env("CONTRACT_DEBUG")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
