//! Authentication façade.
//!
//! The only façade permitted to mutate the token store and the persisted
//! token storage: login/registration save the pair, logout and failed
//! session restores clear it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use studia_domain::{ApiResult, DomainError, UserProfile};
use tracing::{info, warn};

use super::{parse_id, parse_timestamp};
use crate::auth::{TokenStorage, TokenStore};
use crate::http::RequestPipeline;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    display_name: &'a str,
}

/// Login/registration response: token pair plus the signed-in user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionDto {
    access_token: String,
    refresh_token: String,
    #[serde(default = "bearer")]
    token_type: String,
    user: UserDto,
}

fn bearer() -> String {
    "Bearer".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: String,
    email: String,
    display_name: String,
    created_at: String,
}

fn map_user(dto: UserDto) -> Result<UserProfile, DomainError> {
    Ok(UserProfile {
        id: parse_id(&dto.id, "user.id")?,
        email: dto.email,
        display_name: dto.display_name,
        created_at: parse_timestamp(&dto.created_at, "user.createdAt")?,
    })
}

/// Auth feature façade.
#[derive(Clone)]
pub struct AuthApi {
    pipeline: Arc<RequestPipeline>,
    tokens: Arc<TokenStore>,
    storage: Option<TokenStorage>,
}

impl AuthApi {
    /// Build the façade. `storage` is the optional durable collaborator; an
    /// ephemeral session works without one.
    #[must_use]
    pub fn new(
        pipeline: Arc<RequestPipeline>,
        tokens: Arc<TokenStore>,
        storage: Option<TokenStorage>,
    ) -> Self {
        Self { pipeline, tokens, storage }
    }

    /// Log in with credentials. On success the token pair is saved (and
    /// persisted, when storage is configured) before the profile is
    /// returned.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<UserProfile> {
        let request = LoginRequest { email, password };
        match self.pipeline.post::<_, SessionDto>("/auth/login", &request).await {
            Ok(session) => self.establish_session(session).await,
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Register a new account; the backend signs the user in directly.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> ApiResult<UserProfile> {
        let request = RegisterRequest { email, password, display_name };
        match self.pipeline.post::<_, SessionDto>("/auth/register", &request).await {
            Ok(session) => self.establish_session(session).await,
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Log out. The server-side revoke is best-effort; local state is
    /// cleared regardless of its outcome.
    pub async fn logout(&self) -> ApiResult<()> {
        if let Err(err) = self.pipeline.post::<_, ()>("/auth/logout", &serde_json::json!({})).await
        {
            warn!(error = %err, "server-side logout failed, clearing local session anyway");
        }

        self.tokens.clear_tokens().await;
        if let Some(storage) = &self.storage {
            if let Err(err) = storage.clear().await {
                warn!(error = %err, "failed to clear persisted tokens");
            }
        }

        info!("logged out");
        ApiResult::Success(())
    }

    /// Restore a persisted session into the in-memory store. Returns `true`
    /// when a complete pair was found.
    pub async fn restore_session(&self) -> Result<bool, DomainError> {
        let Some(storage) = &self.storage else {
            return Ok(false);
        };

        match storage.load().await {
            Ok(Some(credentials)) => {
                self.tokens
                    .save_tokens(
                        credentials.access_token,
                        credentials.refresh_token,
                        credentials.token_type,
                    )
                    .await;
                info!("session restored from persisted tokens");
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => Err(DomainError::new(
                studia_domain::ErrorKind::Unknown,
                "failed to read persisted tokens",
            )
            .with_details(err)),
        }
    }

    async fn establish_session(&self, session: SessionDto) -> ApiResult<UserProfile> {
        self.tokens
            .save_tokens(
                session.access_token.clone(),
                session.refresh_token.clone(),
                session.token_type.clone(),
            )
            .await;

        if let Some(storage) = &self.storage {
            let credentials = crate::auth::Credentials::new(
                session.access_token.clone(),
                session.refresh_token.clone(),
                session.token_type.clone(),
            );
            if let Err(err) = storage.persist(&credentials).await {
                // Non-fatal: the in-memory session is live either way.
                warn!(error = %err, "failed to persist tokens");
            }
        }

        map_user(session.user).into()
    }
}
