//! In-memory token store.
//!
//! Single source of truth for the current token pair. The pair is held
//! behind one `RwLock<Option<Credentials>>` so readers always observe either
//! a complete pair or nothing; concurrent saves are last-writer-wins.

use tokio::sync::{watch, RwLock};
use tracing::info;

use super::types::Credentials;

/// Thread-safe holder of the current access/refresh tokens plus an
/// observable authorization flag for UI layers.
///
/// Durability is not this type's concern: an external
/// [`super::TokenStorage`] persists the pair across restarts.
pub struct TokenStore {
    current: RwLock<Option<Credentials>>,
    authorized_tx: watch::Sender<bool>,
}

impl TokenStore {
    #[must_use]
    pub fn new() -> Self {
        let (authorized_tx, _) = watch::channel(false);
        Self { current: RwLock::new(None), authorized_tx }
    }

    /// Store a complete token pair atomically and mark the session
    /// authorized. No validation of token format.
    pub async fn save_tokens(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        token_type: impl Into<String>,
    ) {
        let credentials = Credentials::new(access_token, refresh_token, token_type);
        *self.current.write().await = Some(credentials);
        self.authorized_tx.send_replace(true);
        info!("tokens saved, session authorized");
    }

    /// Current access token, or `None` when unauthenticated.
    pub async fn access_token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|c| c.access_token.clone())
    }

    /// Current refresh token, or `None` when unauthenticated.
    pub async fn refresh_token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|c| c.refresh_token.clone())
    }

    /// Snapshot of the full pair.
    pub async fn credentials(&self) -> Option<Credentials> {
        self.current.read().await.clone()
    }

    /// Reset to the unauthenticated state. Used on logout and on an
    /// unrecoverable refresh failure. Idempotent.
    pub async fn clear_tokens(&self) {
        *self.current.write().await = None;
        self.authorized_tx.send_replace(false);
        info!("tokens cleared, session unauthorized");
    }

    /// Whether a token pair is currently held.
    pub async fn is_authorized(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Subscribe to authorization-state changes. The UI uses this to decide
    /// whether to show authenticated screens.
    #[must_use]
    pub fn watch_authorized(&self) -> watch::Receiver<bool> {
        self.authorized_tx.subscribe()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
