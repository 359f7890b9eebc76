//! Client configuration.
//!
//! Loads from environment variables with a `Default` fallback for the
//! production endpoints.
//!
//! ## Environment Variables
//! - `STUDIA_API_BASE_URL`: API base URL (e.g., `https://api.studia.app/v1`)
//! - `STUDIA_API_TIMEOUT_SECS`: request timeout in seconds
//! - `STUDIA_APP_VERSION`: version reported in client headers
//! - `STUDIA_BUILD_ID`: build identifier reported in client headers

use std::time::Duration;

use studia_domain::{DomainError, ErrorKind};

/// Configuration for the request pipeline.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the API (e.g., "https://api.studia.app/v1").
    pub base_url: String,
    /// Path of the token refresh endpoint, relative to `base_url`.
    pub refresh_path: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// Client identification headers. Informational only, not part of the
    /// authentication contract.
    pub app_name: String,
    pub app_version: String,
    pub platform: String,
    pub build_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.studia.app/v1".to_string(),
            refresh_path: "/auth/refresh".to_string(),
            timeout: Duration::from_secs(30),
            app_name: "studia".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            platform: std::env::consts::OS.to_string(),
            build_id: "dev".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    /// Returns an error if a variable is present but unparsable.
    pub fn from_env() -> Result<Self, DomainError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("STUDIA_API_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(raw) = std::env::var("STUDIA_API_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|e| {
                DomainError::new(ErrorKind::Unknown, format!("Invalid timeout: {e}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(version) = std::env::var("STUDIA_APP_VERSION") {
            config.app_version = version;
        }
        if let Ok(build) = std::env::var("STUDIA_BUILD_ID") {
            config.build_id = build;
        }

        Ok(config)
    }

    /// Full URL for an API path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
