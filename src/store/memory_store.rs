use std::sync::RwLock;

use super::{SessionStore, StoreError};

/// Process-local session storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`, handy for fabricated sessions.
    pub fn with_token(token: impl Into<String>) -> Self {
        MemoryStore {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self) -> Option<String> {
        // A poisoned lock still holds the last written value.
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}
