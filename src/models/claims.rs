use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::utils::value::value_to_string;

/// Identity claims carried in the payload segment of a session token.
///
/// Only `role` matters for access decisions; every other field is kept
/// verbatim in `extra` for display purposes.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Claims {
    /// Only string roles are kept; any other JSON type reads as no role.
    #[serde(
        default,
        deserialize_with = "string_only",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
    /// Numeric or structured subjects are rendered as text.
    #[serde(
        default,
        deserialize_with = "any_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub: Option<String>,
    /// Any additional claim fields we don't explicitly model.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Claims {
    /// Validates the raw `role` claim against the known roles.
    /// Returns `None` if the claim is missing, empty or unrecognised.
    pub fn role(&self, registry: &RoleRegistry) -> Option<Role> {
        self.role.as_deref().and_then(|name| registry.parse(name))
    }

    /// Expiry as seconds since the epoch, if the token carries one.
    pub fn expires_at(&self) -> Option<i64> {
        match self.extra.get("exp")? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            _ => None,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }

    /// Flattens all claims into sanitized strings, e.g. for `whoami` output.
    pub fn attributes(&self) -> HashMap<String, String> {
        let mut attributes: HashMap<String, String> = self
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), value_to_string(value)))
            .collect();
        if let Some(role) = &self.role {
            attributes.insert("role".to_string(), value_to_string(&Value::from(role.as_str())));
        }
        if let Some(sub) = &self.sub {
            attributes.insert("sub".to_string(), value_to_string(&Value::from(sub.as_str())));
        }
        attributes
    }
}

fn string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn any_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(value_to_string(&other)),
    })
}

/// A dashboard role. Roles form a flat set: there is no ordering or
/// inheritance between them, and `Admin` does not imply `Dev`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Dev,
    /// An application-defined role declared in configuration.
    Custom(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::Dev => "Dev",
            Role::Custom(name) => name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of role names this deployment recognises.
///
/// `Admin` and `Dev` are always known; anything else must be registered.
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    custom: HashSet<String>,
}

impl RoleRegistry {
    pub fn new<I, S>(custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RoleRegistry {
            custom: custom
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| !name.is_empty())
                .collect(),
        }
    }

    pub fn parse(&self, name: &str) -> Option<Role> {
        match name {
            "Admin" => Some(Role::Admin),
            "Dev" => Some(Role::Dev),
            other if self.custom.contains(other) => Some(Role::Custom(other.to_string())),
            _ => None,
        }
    }
}
