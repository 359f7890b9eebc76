//! User-settings façade.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use studia_domain::{ApiResult, DomainError, Theme, UserSettings};

use crate::http::RequestPipeline;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsDto {
    locale: String,
    theme: String,
    notifications_enabled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsUpdate<'a> {
    locale: &'a str,
    theme: &'a str,
    notifications_enabled: bool,
}

fn map_theme(raw: &str) -> Result<Theme, DomainError> {
    match raw {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        "system" => Ok(Theme::System),
        other => Err(DomainError::mapping(format!("unknown theme '{other}'"))),
    }
}

fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
        Theme::System => "system",
    }
}

fn map_settings(dto: SettingsDto) -> Result<UserSettings, DomainError> {
    Ok(UserSettings {
        locale: dto.locale,
        theme: map_theme(&dto.theme)?,
        notifications_enabled: dto.notifications_enabled,
    })
}

/// User-settings feature façade. Read/write-through: no token side effects.
#[derive(Clone)]
pub struct SettingsApi {
    pipeline: Arc<RequestPipeline>,
}

impl SettingsApi {
    #[must_use]
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    /// Fetch the current user's settings.
    pub async fn settings(&self) -> ApiResult<UserSettings> {
        match self.pipeline.get::<SettingsDto>("/settings").await {
            Ok(dto) => map_settings(dto).into(),
            Err(err) => ApiResult::Error(err),
        }
    }

    /// Replace the current user's settings, returning the stored record.
    pub async fn update(&self, settings: &UserSettings) -> ApiResult<UserSettings> {
        let update = SettingsUpdate {
            locale: &settings.locale,
            theme: theme_name(settings.theme),
            notifications_enabled: settings.notifications_enabled,
        };
        match self.pipeline.put::<_, SettingsDto>("/settings", &update).await {
            Ok(dto) => map_settings(dto).into(),
            Err(err) => ApiResult::Error(err),
        }
    }
}
