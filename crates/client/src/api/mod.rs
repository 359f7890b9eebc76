//! Per-feature façades over the request pipeline.
//!
//! Each façade translates a feature-level intent into one pipeline call plus
//! an explicit one-way DTO→domain mapping, and returns the tagged
//! [`studia_domain::ApiResult`]. Mapping failures (missing field, enum value
//! out of range, malformed id) are validation errors, never panics.
//!
//! Side-effect boundary: only [`AuthApi`] may touch the token store and the
//! persisted token storage; every other façade is read/write-through.

mod auth;
mod courses;
mod rooms;
mod settings;
mod tree;

pub use auth::AuthApi;
pub use courses::{CourseDraft, CourseFilters, CoursesApi};
pub use rooms::RoomsApi;
pub use settings::SettingsApi;
pub use tree::TreeApi;

use chrono::{DateTime, Utc};
use studia_domain::DomainError;
use uuid::Uuid;

/// Parse a wire id, reporting the offending field on failure.
pub(crate) fn parse_id(raw: &str, field: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw)
        .map_err(|e| DomainError::mapping(format!("invalid id in field '{field}'"))
            .with_details(e.to_string()))
}

/// Parse an RFC 3339 timestamp, reporting the offending field on failure.
pub(crate) fn parse_timestamp(raw: &str, field: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::mapping(format!("invalid timestamp in field '{field}'"))
            .with_details(e.to_string()))
}
