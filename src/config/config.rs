use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LoggingConfig;
use super::routes::{RedirectConfig, RouteConfig};
use super::store::SessionStoreConfig;

/// Prefix for environment variables overriding the YAML file.
/// Nested keys are separated by `__`, e.g. `DASHGATE_API__BASE_URL`.
pub const ENV_PREFIX: &str = "DASHGATE_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: logging, session storage, the remote API and the route table.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub session_store: SessionStoreConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub redirects: RedirectConfig,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error loading configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("error rendering configuration schema: {0}")]
    Schema(#[from] serde_json::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(Box::new(e))
    }
}

/// Load config from the YAML file at `path`, with `DASHGATE_*` environment overrides.
pub fn load_config(path: &str) -> Result<ConfigV1, ConfigError> {
    let figment = Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));
    from_figment(figment)
}

/// Extract a versioned config from an already assembled figment.
pub fn from_figment(figment: Figment) -> Result<ConfigV1, ConfigError> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// Render the JSON schema for the configuration.
pub fn config_schema() -> Result<String, ConfigError> {
    let schema = schema_for!(Config);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Where the dashboard backend lives and how requests to it behave.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Attach an `X-Request-Id` header to every outbound request.
    #[serde(default)]
    pub request_id: bool,
}

fn default_timeout_in_ms() -> u64 {
    10_000
}

fn default_login_path() -> String {
    "/auth/login".to_string()
}

/// Role registry and gate options.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct AuthConfig {
    /// Application-defined roles recognised in addition to `Admin` and `Dev`.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Treat tokens whose `exp` lies in the past like malformed ones.
    #[serde(default)]
    pub check_expiry: bool,
}
