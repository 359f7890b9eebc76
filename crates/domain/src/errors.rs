//! Error types used throughout the client.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of caller-visible error categories.
///
/// The kind drives UI behaviour: `Unauthorized` routes to a re-login prompt,
/// `Network`/`Timeout` show a retry affordance, `Validation` surfaces
/// `details` inline next to the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No connectivity or DNS resolution failure.
    Network,
    /// Connect or read timeout.
    Timeout,
    /// Missing, invalid, or expired credentials (after the refresh retry).
    Unauthorized,
    /// Valid credentials but insufficient rights.
    Forbidden,
    NotFound,
    /// Business-rule rejection, or a local DTO-to-domain mapping failure.
    Validation,
    /// Backend 5xx.
    Server,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Validation => "validation",
            Self::Server => "server",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Immutable error value produced by the translator and consumed by
/// UI-facing result types.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind} error: {message}")]
pub struct DomainError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl DomainError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), details: None }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Shorthand for a local mapping failure (missing field, enum value out
    /// of range). Treated as validation rather than an exception.
    #[must_use]
    pub fn mapping(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for domain errors.
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = DomainError::new(ErrorKind::Forbidden, "no access to room");
        assert_eq!(err.to_string(), "forbidden error: no access to room");
    }

    #[test]
    fn with_details_preserves_kind_and_message() {
        let err = DomainError::new(ErrorKind::Validation, "Invalid email")
            .with_details("must contain @");
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Invalid email");
        assert_eq!(err.details.as_deref(), Some("must contain @"));
    }

    #[test]
    fn kind_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
    }
}
