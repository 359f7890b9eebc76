//! Durable token storage on top of a persisted key-value settings store.
//!
//! The settings store itself is an external collaborator (platform keychain,
//! preferences file, ...); this module only defines its minimal call
//! contract and the token-specific keys layered on top. `TokenStore` stays
//! purely in-memory; the auth façade drives persistence through
//! [`TokenStorage`] on login/logout and session restore.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::types::Credentials;

const ACCESS_KEY: &str = "auth.access_token";
const REFRESH_KEY: &str = "auth.refresh_token";
const TOKEN_TYPE_KEY: &str = "auth.token_type";

/// Minimal contract of the persisted key-value settings collaborator.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored value for `key`, or `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), String>;

    /// Remove `key` if present. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), String>;
}

/// Token-specific persistence layered on a [`SettingsStore`].
#[derive(Clone)]
pub struct TokenStorage {
    settings: Arc<dyn SettingsStore>,
}

impl TokenStorage {
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    /// Persist a complete token pair.
    ///
    /// # Errors
    /// Returns the settings store's error string if a write fails.
    pub async fn persist(&self, credentials: &Credentials) -> Result<(), String> {
        debug!("persisting token pair");
        self.settings.set(ACCESS_KEY, &credentials.access_token).await?;
        self.settings.set(REFRESH_KEY, &credentials.refresh_token).await?;
        self.settings.set(TOKEN_TYPE_KEY, &credentials.token_type).await?;
        Ok(())
    }

    /// Load a previously persisted pair. Returns `None` when either half of
    /// the pair is missing, upholding the both-present-or-both-absent
    /// invariant even across partial writes by an older build.
    ///
    /// # Errors
    /// Returns the settings store's error string if a read fails.
    pub async fn load(&self) -> Result<Option<Credentials>, String> {
        let access = self.settings.get(ACCESS_KEY).await?;
        let refresh = self.settings.get(REFRESH_KEY).await?;
        let token_type =
            self.settings.get(TOKEN_TYPE_KEY).await?.unwrap_or_else(|| "Bearer".to_string());

        match (access, refresh) {
            (Some(access), Some(refresh)) => {
                Ok(Some(Credentials::new(access, refresh, token_type)))
            }
            _ => Ok(None),
        }
    }

    /// Remove every persisted token key. Idempotent.
    ///
    /// # Errors
    /// Returns the settings store's error string if a removal fails.
    pub async fn clear(&self) -> Result<(), String> {
        debug!("clearing persisted tokens");
        self.settings.remove(ACCESS_KEY).await?;
        self.settings.remove(REFRESH_KEY).await?;
        self.settings.remove(TOKEN_TYPE_KEY).await?;
        Ok(())
    }
}

/// In-memory settings store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.values.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), String> {
        self.values.write().await.remove(key);
        Ok(())
    }
}
