use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use super::token_decoder::decode_claims;
use crate::config::{AuthConfig, RedirectConfig};
use crate::models::{Claims, RoleRegistry, RouteGuardSpec};
use crate::store::SessionStore;

/// Why a navigation was refused. Each reason maps to exactly one redirect target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No token is stored.
    NoSession,
    /// A token is stored but cannot be decoded (or has expired, when checked).
    InvalidToken,
    /// The session is valid but its role is missing, unknown, or not allowed here.
    RoleNotAllowed,
}

impl DenialReason {
    /// Unauthenticated users go to the login view; authenticated but
    /// unauthorized users go to the access-denied view.
    pub fn redirect<'a>(&self, targets: &'a RedirectConfig) -> &'a str {
        match self {
            DenialReason::NoSession | DenialReason::InvalidToken => &targets.login,
            DenialReason::RoleNotAllowed => &targets.access_denied,
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DenialReason::NoSession => "no session",
            DenialReason::InvalidToken => "invalid token",
            DenialReason::RoleNotAllowed => "role not allowed",
        };
        f.write_str(text)
    }
}

/// Decides per navigation whether the stored identity may see a route.
///
/// Nothing is cached: every call reads the session store afresh, because
/// a login or logout may have happened since the previous navigation.
pub struct AuthGate {
    store: Arc<dyn SessionStore>,
    roles: RoleRegistry,
    check_expiry: bool,
}

impl AuthGate {
    pub fn new(store: Arc<dyn SessionStore>, config: &AuthConfig) -> Self {
        AuthGate {
            store,
            roles: RoleRegistry::new(config.roles.iter().cloned()),
            check_expiry: config.check_expiry,
        }
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    /// Reads and decodes the current session.
    ///
    /// An undecodable token is cleared from the store so the next
    /// navigation starts from a clean "no session" state.
    pub fn current_claims(&self) -> Result<Claims, DenialReason> {
        let token = self.store.get().ok_or_else(|| {
            debug!("No session token stored.");
            DenialReason::NoSession
        })?;

        let claims = match decode_claims(&token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Stored session token is malformed, clearing it: {}", e);
                self.discard_session();
                return Err(DenialReason::InvalidToken);
            }
        };

        if self.check_expiry && claims.is_expired(Utc::now().timestamp()) {
            warn!("Stored session token has expired, clearing it.");
            self.discard_session();
            return Err(DenialReason::InvalidToken);
        }

        Ok(claims)
    }

    /// Full decision for one route, returning the claims on success so the
    /// caller does not need to decode the token a second time.
    pub fn check(&self, spec: &RouteGuardSpec) -> Result<Claims, DenialReason> {
        let claims = self.current_claims()?;

        let Some(role) = claims.role(&self.roles) else {
            debug!(
                "Session role {:?} is missing or unrecognised.",
                claims.role.as_deref()
            );
            return Err(DenialReason::RoleNotAllowed);
        };

        if spec.permits(&role) {
            debug!("Role '{}' allowed.", role);
            Ok(claims)
        } else {
            debug!(
                "Role '{}' not in the allowed set {:?}.",
                role,
                spec.allowed_roles()
            );
            Err(DenialReason::RoleNotAllowed)
        }
    }

    pub fn is_allowed(&self, spec: &RouteGuardSpec) -> bool {
        self.check(spec).is_ok()
    }

    fn discard_session(&self) {
        if let Err(e) = self.store.clear() {
            error!(
                "Failed to clear session from '{}' store: {}",
                self.store.name(),
                e
            );
        }
    }
}
