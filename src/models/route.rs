use std::collections::HashSet;

use super::claims::Role;

/// Static declaration of which roles may access a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuardSpec {
    allowed_roles: HashSet<Role>,
}

impl RouteGuardSpec {
    pub fn new(allowed_roles: impl IntoIterator<Item = Role>) -> Self {
        RouteGuardSpec {
            allowed_roles: allowed_roles.into_iter().collect(),
        }
    }

    pub fn allowed_roles(&self) -> &HashSet<Role> {
        &self.allowed_roles
    }

    pub fn permits(&self, role: &Role) -> bool {
        self.allowed_roles.contains(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_flat() {
        let spec = RouteGuardSpec::new([Role::Dev]);
        assert!(spec.permits(&Role::Dev));
        assert!(!spec.permits(&Role::Admin));
        assert!(!spec.permits(&Role::Custom("Dev2".to_string())));
        assert_eq!(spec.allowed_roles().len(), 1);
    }
}
