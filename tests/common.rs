#![allow(dead_code)]

use std::sync::Arc;

use dashgate::config::{from_figment, ConfigV1};
use dashgate::startup::build_state;
use dashgate::state::AppState;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

/// Secret the fake backend signs with. The client never sees it.
pub const BACKEND_SECRET: &[u8] = b"backend-signing-secret";

/// A dashboard config pointing at `base_url`, with the given session store block.
pub fn config_yaml(base_url: &str, session_store: &str) -> String {
    format!(
        r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "console"
session_store:
{session_store}
api:
  base_url: "{base_url}"
  timeout_in_ms: 3000
  login_path: /auth/login
auth:
  roles: [Support]
redirects:
  login: /login
  access_denied: /access-denied
routes:
  - path: /
    public: true
  - path: /orders
    allowed_roles: [Admin, Dev]
  - path: /companies
    allowed_roles: [Admin, Dev, Support]
  - path: /email-logs
    allowed_roles: [Admin, Support]
  - path: /settings
    allowed_roles: [Admin]
  - path: /analysis
    allowed_roles: [Admin]
"#
    )
}

pub fn load_test_config(yaml: &str) -> ConfigV1 {
    from_figment(Figment::new().merge(Yaml::string(yaml))).expect("Failed to parse test config YAML")
}

pub fn memory_state(base_url: &str) -> AppState {
    let config = load_test_config(&config_yaml(base_url, "  type: memory"));
    build_state(Arc::new(config)).expect("state should build")
}

/// A backend-signed HS256 token carrying `role`.
pub fn signed_token(role: &str, sub: &str) -> String {
    let claims = json!({
        "sub": sub,
        "role": role,
        "exp": 4102444800i64,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(BACKEND_SECRET),
    )
    .expect("Failed to create token")
}
