use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::config::{RedirectConfig, RouteConfig};
use crate::models::{RoleRegistry, RouteGuardSpec};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("route '{path}' lists unknown role '{role}'")]
    UnknownRole { path: String, role: String },
    #[error("route '{0}' is declared more than once")]
    Duplicate(String),
    #[error("route '{0}' must be public or allow at least one role")]
    NoRoles(String),
    #[error("route '{0}' cannot be both public and role-restricted")]
    Conflicting(String),
    #[error("redirect target '{0}' must be public")]
    GuardedRedirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Guarded(RouteGuardSpec),
}

/// Immutable map from normalised path to its access rule.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, RouteAccess>,
}

impl RouteTable {
    /// Builds the table, validating role names against `roles`.
    /// The login and access-denied targets are always present and public.
    pub fn from_config(
        routes: &[RouteConfig],
        redirects: &RedirectConfig,
        roles: &RoleRegistry,
    ) -> Result<Self, RouteTableError> {
        let mut table = HashMap::new();

        for route in routes {
            let path = normalize_path(&route.path);
            let access = match (route.public, route.allowed_roles.is_empty()) {
                (true, true) => RouteAccess::Public,
                (true, false) => return Err(RouteTableError::Conflicting(path)),
                (false, true) => return Err(RouteTableError::NoRoles(path)),
                (false, false) => {
                    let allowed = route
                        .allowed_roles
                        .iter()
                        .map(|name| {
                            roles.parse(name).ok_or_else(|| RouteTableError::UnknownRole {
                                path: path.clone(),
                                role: name.clone(),
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    RouteAccess::Guarded(RouteGuardSpec::new(allowed))
                }
            };
            if table.insert(path.clone(), access).is_some() {
                return Err(RouteTableError::Duplicate(path));
            }
        }

        for target in [&redirects.login, &redirects.access_denied] {
            let path = normalize_path(target);
            match table.get(&path) {
                Some(RouteAccess::Guarded(_)) => {
                    return Err(RouteTableError::GuardedRedirect(path));
                }
                Some(RouteAccess::Public) => {}
                None => {
                    table.insert(path, RouteAccess::Public);
                }
            }
        }

        debug!("Route table built with {} routes.", table.len());
        Ok(RouteTable { routes: table })
    }

    pub fn access(&self, path: &str) -> Option<&RouteAccess> {
        self.routes.get(&normalize_path(path))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Drops query and fragment, and any trailing `/` except on the root.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn route(path: &str, public: bool, roles: &[&str]) -> RouteConfig {
        RouteConfig {
            path: path.to_string(),
            public,
            allowed_roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/orders/"), "/orders");
        assert_eq!(normalize_path("orders?page=2"), "/orders");
        assert_eq!(normalize_path("/settings#mail"), "/settings");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn test_table_from_config() {
        let table = RouteTable::from_config(
            &[
                route("/orders", false, &["Admin", "Dev"]),
                route("/", true, &[]),
            ],
            &RedirectConfig::default(),
            &RoleRegistry::default(),
        )
        .unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.access("/"), Some(&RouteAccess::Public));
        assert_eq!(table.access("/login"), Some(&RouteAccess::Public));
        assert_eq!(table.access("/access-denied/"), Some(&RouteAccess::Public));
        assert_eq!(
            table.access("/orders?sort=date"),
            Some(&RouteAccess::Guarded(RouteGuardSpec::new([
                Role::Admin,
                Role::Dev
            ])))
        );
        assert_eq!(table.access("/companies"), None);
    }

    #[test]
    fn test_invalid_tables() {
        let registry = RoleRegistry::default();
        let redirects = RedirectConfig::default();

        assert_eq!(
            RouteTable::from_config(&[route("/x", false, &["Root"])], &redirects, &registry)
                .unwrap_err(),
            RouteTableError::UnknownRole {
                path: "/x".to_string(),
                role: "Root".to_string()
            }
        );
        assert_eq!(
            RouteTable::from_config(&[route("/x", false, &[])], &redirects, &registry)
                .unwrap_err(),
            RouteTableError::NoRoles("/x".to_string())
        );
        assert_eq!(
            RouteTable::from_config(&[route("/x", true, &["Admin"])], &redirects, &registry)
                .unwrap_err(),
            RouteTableError::Conflicting("/x".to_string())
        );
        assert_eq!(
            RouteTable::from_config(
                &[route("/x", true, &[]), route("/x/", true, &[])],
                &redirects,
                &registry
            )
            .unwrap_err(),
            RouteTableError::Duplicate("/x".to_string())
        );
        assert_eq!(
            RouteTable::from_config(&[route("/login", false, &["Admin"])], &redirects, &registry)
                .unwrap_err(),
            RouteTableError::GuardedRedirect("/login".to_string())
        );
    }
}
