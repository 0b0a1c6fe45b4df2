use std::sync::Arc;

use tracing::{debug, info};

use super::table::{normalize_path, RouteAccess, RouteTable};
use crate::auth::{AuthGate, DenialReason};
use crate::config::RedirectConfig;
use crate::models::Claims;

/// Outcome of a single navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    /// Show the view. `claims` is set for guarded routes.
    Render {
        path: String,
        claims: Option<Claims>,
    },
    /// Go to the login or access-denied view instead.
    Redirect { to: String, reason: DenialReason },
    /// No such route; the caller shows its error view.
    NotFound { path: String },
}

/// The routing layer: looks up the route, asks the gate, and picks a redirect on denial.
pub struct Navigator {
    table: RouteTable,
    gate: Arc<AuthGate>,
    redirects: RedirectConfig,
}

impl Navigator {
    pub fn new(table: RouteTable, gate: Arc<AuthGate>, redirects: RedirectConfig) -> Self {
        Navigator {
            table,
            gate,
            redirects,
        }
    }

    /// Evaluated afresh on every call; nothing from earlier navigations is reused.
    pub fn navigate(&self, path: &str) -> Navigation {
        let path = normalize_path(path);
        let spec = match self.table.access(&path) {
            None => {
                debug!("No route for '{}'.", path);
                return Navigation::NotFound { path };
            }
            Some(RouteAccess::Public) => {
                return Navigation::Render { path, claims: None };
            }
            Some(RouteAccess::Guarded(spec)) => spec,
        };

        match self.gate.check(spec) {
            Ok(claims) => Navigation::Render {
                path,
                claims: Some(claims),
            },
            Err(reason) => {
                let to = reason.redirect(&self.redirects).to_string();
                info!("Navigation to '{}' denied ({}), redirecting to '{}'.", path, reason, to);
                Navigation::Redirect { to, reason }
            }
        }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, RouteConfig};
    use crate::store::{MemoryStore, SessionStore};
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use serde_json::json;

    fn token(role: &str) -> String {
        format!(
            "eyJhbGciOiJIUzI1NiJ9.{}.c2ln",
            URL_SAFE_NO_PAD.encode(json!({ "role": role }).to_string())
        )
    }

    fn navigator(store: Arc<MemoryStore>) -> Navigator {
        let gate = Arc::new(AuthGate::new(store, &AuthConfig::default()));
        let routes = vec![
            RouteConfig {
                path: "/orders".to_string(),
                public: false,
                allowed_roles: vec!["Admin".to_string(), "Dev".to_string()],
            },
            RouteConfig {
                path: "/settings".to_string(),
                public: false,
                allowed_roles: vec!["Admin".to_string()],
            },
        ];
        let redirects = RedirectConfig::default();
        let table = RouteTable::from_config(&routes, &redirects, gate.roles()).unwrap();
        Navigator::new(table, gate, redirects)
    }

    #[test]
    fn test_no_session_redirects_to_login() {
        let nav = navigator(Arc::new(MemoryStore::new()));
        assert_eq!(
            nav.navigate("/settings"),
            Navigation::Redirect {
                to: "/login".to_string(),
                reason: DenialReason::NoSession
            }
        );
    }

    #[test]
    fn test_invalid_token_redirects_to_login_and_clears() {
        let store = Arc::new(MemoryStore::with_token("garbage"));
        let nav = navigator(store.clone());
        assert_eq!(
            nav.navigate("/orders"),
            Navigation::Redirect {
                to: "/login".to_string(),
                reason: DenialReason::InvalidToken
            }
        );
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_wrong_role_redirects_to_access_denied() {
        let store = Arc::new(MemoryStore::with_token(token("Dev")));
        let nav = navigator(store.clone());
        assert_eq!(
            nav.navigate("/settings"),
            Navigation::Redirect {
                to: "/access-denied".to_string(),
                reason: DenialReason::RoleNotAllowed
            }
        );
        assert!(store.get().is_some());

        match nav.navigate("/orders/") {
            Navigation::Render { path, claims } => {
                assert_eq!(path, "/orders");
                assert_eq!(claims.unwrap().role.as_deref(), Some("Dev"));
            }
            other => panic!("expected render, got {:?}", other),
        }
    }

    #[test]
    fn test_public_and_unknown_routes() {
        let nav = navigator(Arc::new(MemoryStore::new()));
        assert_eq!(
            nav.navigate("/login?next=/orders"),
            Navigation::Render {
                path: "/login".to_string(),
                claims: None
            }
        );
        assert_eq!(
            nav.navigate("/nowhere"),
            Navigation::NotFound {
                path: "/nowhere".to_string()
            }
        );
    }
}
