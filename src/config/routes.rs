use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A navigable route and the roles allowed to see it.
///
/// Either `public` is set, or `allowed_roles` lists at least one role.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct RouteConfig {
    pub path: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub allowed_roles: Vec<String>,
}

/// Named destinations the navigator redirects to on denial.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct RedirectConfig {
    #[serde(default = "default_login")]
    pub login: String,
    #[serde(default = "default_access_denied")]
    pub access_denied: String,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        RedirectConfig {
            login: default_login(),
            access_denied: default_access_denied(),
        }
    }
}

fn default_login() -> String {
    "/login".to_string()
}

fn default_access_denied() -> String {
    "/access-denied".to_string()
}
