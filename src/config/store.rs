use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Key under which the session token is persisted unless configured otherwise.
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// The session store backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
#[serde(tag = "type")]
pub enum SessionStoreConfig {
    /// Process-local storage; the session is lost when the process exits.
    #[default]
    #[serde(rename = "memory")]
    Memory,
    /// Durable storage in a small JSON key-value file.
    #[serde(rename = "file")]
    File(FileStoreConfig),
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FileStoreConfig {
    pub path: PathBuf,
    #[serde(default = "default_token_key")]
    pub key: String,
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}
