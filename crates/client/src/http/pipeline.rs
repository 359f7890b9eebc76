//! Authenticated request pipeline.
//!
//! Executes one logical API call: default headers, bearer attachment, JSON
//! codecs, and on 401 a one-shot refresh-token exchange followed by exactly
//! one retry of the original request. Every failure mode, thrown or
//! status-coded, surfaces as a `DomainError`; raw transport errors never
//! reach callers.
//!
//! Concurrent calls that each hit 401 each perform their own refresh; the
//! token store is last-writer-wins and callers must tolerate the redundant
//! exchanges.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use studia_domain::{DomainError, ErrorKind};
use tracing::{debug, warn};

use crate::auth::{RefreshRequest, TokenResponse, TokenStore};
use crate::config::ClientConfig;
use crate::errors;

/// HTTP pipeline shared by every feature façade.
#[derive(Clone)]
pub struct RequestPipeline {
    client: ReqwestClient,
    config: ClientConfig,
    tokens: Arc<TokenStore>,
}

impl RequestPipeline {
    /// Build the pipeline with the configured timeout and default headers.
    ///
    /// # Errors
    /// Returns an error if a client-identification value is not a valid
    /// header or the underlying client cannot be constructed.
    pub fn new(config: ClientConfig, tokens: Arc<TokenStore>) -> Result<Self, DomainError> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .default_headers(default_headers(&config)?)
            .build()
            .map_err(|e| {
                DomainError::new(ErrorKind::Unknown, "failed to build HTTP client")
                    .with_details(e.to_string())
            })?;

        Ok(Self { client, config, tokens })
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        self.execute(Method::GET, path, &[], None).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, DomainError> {
        self.execute(Method::GET, path, query, None).await
    }

    /// Execute a POST request with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, DomainError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, &[], Some(to_body(body)?)).await
    }

    /// Execute a PUT request with a JSON body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, DomainError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::PUT, path, &[], Some(to_body(body)?)).await
    }

    /// Execute a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        self.execute(Method::DELETE, path, &[], None).await
    }

    /// Execute one logical call with bearer authentication and the one-shot
    /// 401 refresh-and-retry.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, DomainError> {
        let url = self.config.url_for(path);
        let token = self.tokens.access_token().await;

        let response = self.send_once(&method, &url, query, body.as_ref(), token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(refresh_token) = self.tokens.refresh_token().await {
                warn!(%method, %url, "401 received, attempting token refresh");
                self.refresh_tokens(&refresh_token).await?;

                // Retry the original request exactly once with the new
                // token. A second 401 falls through to the translator below.
                let token = self.tokens.access_token().await;
                let retried =
                    self.send_once(&method, &url, query, body.as_ref(), token.as_deref()).await?;
                return Self::read_body(retried).await;
            }
        }

        Self::read_body(response).await
    }

    /// Single request execution; transport failures are translated here.
    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Response, DomainError> {
        let mut request = self.client.request(method.clone(), url);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        debug!(%method, %url, authenticated = token.is_some(), "sending request");

        let response = request.send().await.map_err(|e| errors::from_transport(&e))?;
        debug!(%method, %url, status = %response.status(), "received response");
        Ok(response)
    }

    /// Deserialize a success body or translate the failure.
    async fn read_body<T: DeserializeOwned>(response: Response) -> Result<T, DomainError> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(errors::from_response(status, &text));
        }

        // 204/205 carry no body; let unit-like types deserialize from null.
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return serde_json::from_value(Value::Null).map_err(|e| {
                DomainError::new(ErrorKind::Unknown, "no-content response for a typed body")
                    .with_details(e.to_string())
            });
        }

        response.json().await.map_err(|e| errors::from_transport(&e))
    }

    /// One refresh-token exchange. On success the new pair is stored; any
    /// failure clears the store and surfaces `Unauthorized` — the session is
    /// not recoverable without a fresh login.
    async fn refresh_tokens(&self, refresh_token: &str) -> Result<(), DomainError> {
        let url = self.config.url_for(&self.config.refresh_path);
        let body = RefreshRequest { refresh_token: refresh_token.to_string() };

        let outcome = async {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| errors::from_transport(&e))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(errors::from_response(status, &text));
            }

            response.json::<TokenResponse>().await.map_err(|e| errors::from_transport(&e))
        }
        .await;

        match outcome {
            Ok(tokens) => {
                self.tokens
                    .save_tokens(tokens.access_token, tokens.refresh_token, tokens.token_type)
                    .await;
                debug!("token refresh succeeded");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, clearing session");
                self.tokens.clear_tokens().await;
                Err(DomainError::new(ErrorKind::Unauthorized, "session expired")
                    .with_details(err.to_string()))
            }
        }
    }

    /// The token store backing this pipeline.
    #[must_use]
    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.tokens
    }
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap, DomainError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let idents = [
        ("x-app-name", config.app_name.as_str()),
        ("x-app-version", config.app_version.as_str()),
        ("x-platform", config.platform.as_str()),
        ("x-build-id", config.build_id.as_str()),
    ];
    for (name, value) in idents {
        let value = HeaderValue::from_str(value).map_err(|e| {
            DomainError::new(ErrorKind::Unknown, format!("invalid value for header {name}"))
                .with_details(e.to_string())
        })?;
        headers.insert(HeaderName::from_static(name), value);
    }

    Ok(headers)
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, DomainError> {
    serde_json::to_value(body).map_err(|e| {
        DomainError::new(ErrorKind::Unknown, "failed to serialize request body")
            .with_details(e.to_string())
    })
}
