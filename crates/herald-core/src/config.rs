use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Namespace under which the cron plugin persists its per-account data.
/// Overridable via config so two herald deployments can share one store.
pub const DEFAULT_CRON_NAMESPACE: &str = "batch.cron";

/// Top-level config (herald.toml + HERALD_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HeraldConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cron: CronConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Settings for the schedule-evaluation subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronConfig {
    /// Plugin-data namespace the schedule registry reads and writes under.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for CronConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

impl HeraldConfig {
    /// Load config from `config_path` (or `~/.herald/herald.toml`) merged
    /// with `HERALD_*` environment overrides.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: HeraldConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("HERALD_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.herald/herald.toml", home)
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.herald/herald.db", home)
}

fn default_namespace() -> String {
    DEFAULT_CRON_NAMESPACE.to_string()
}
