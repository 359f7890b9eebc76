//! Deterministic translation of transport failures into domain errors.
//!
//! Everything here is pure: no I/O and no state, so every mapping is
//! unit-testable. Kind selection follows a fixed fallback order: structured
//! body code → HTTP status → transport error type → unknown.

use reqwest::StatusCode;
use serde::Deserialize;
use studia_domain::{DomainError, ErrorKind};

/// Structured error body the backend emits on business-rule rejections:
/// `{"code": 3001, "message": "Invalid email", "details": "..."}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub details: Option<String>,
}

/// Older endpoints reply with a bare `{"message": "..."}` or
/// `{"error": "..."}` instead of the structured shape.
#[derive(Debug, Deserialize)]
struct MinimalErrorBody {
    #[serde(alias = "error")]
    message: String,
}

/// Best-effort parse of an error body. Tries the structured schema first,
/// then the minimal one; returns `None` when neither matches. Never fails.
#[must_use]
pub fn parse_error_body(text: &str) -> Option<ApiErrorBody> {
    if let Ok(body) = serde_json::from_str::<ApiErrorBody>(text) {
        if body.code.is_some() || body.message.is_some() {
            return Some(body);
        }
    }
    serde_json::from_str::<MinimalErrorBody>(text)
        .ok()
        .map(|minimal| ApiErrorBody { code: None, message: Some(minimal.message), details: None })
}

/// Mapping table from HTTP status to error kind.
#[must_use]
pub fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED => ErrorKind::Unauthorized,
        StatusCode::FORBIDDEN => ErrorKind::Forbidden,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        status if status.is_server_error() => ErrorKind::Server,
        _ => ErrorKind::Unknown,
    }
}

/// Backend error codes are bucketed by thousands digit: 1xxx auth, 2xxx
/// permissions, 3xxx validation, 4xxx missing resources, 5xxx server-side.
/// Codes outside those buckets defer to the HTTP status.
#[must_use]
pub fn kind_for_code(code: i64) -> Option<ErrorKind> {
    match code / 1000 {
        1 => Some(ErrorKind::Unauthorized),
        2 => Some(ErrorKind::Forbidden),
        3 => Some(ErrorKind::Validation),
        4 => Some(ErrorKind::NotFound),
        5 => Some(ErrorKind::Server),
        _ => None,
    }
}

/// Translate a non-success response into a domain error.
///
/// When a structured body is present, its explicit `code` takes precedence
/// over the raw status for kind selection and its `message`/`details` flow
/// through to the caller. Without one, a minimal error is synthesized from
/// the status and its canonical reason.
#[must_use]
pub fn from_status(status: StatusCode, body: Option<&ApiErrorBody>) -> DomainError {
    let kind = body
        .and_then(|b| b.code)
        .and_then(kind_for_code)
        .unwrap_or_else(|| kind_for_status(status));

    let message = body
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| {
            format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("error"))
        });

    let mut err = DomainError::new(kind, message);
    if let Some(details) = body.and_then(|b| b.details.clone()) {
        err = err.with_details(details);
    }
    err
}

/// Parse the body text and translate, in one step.
#[must_use]
pub fn from_response(status: StatusCode, body_text: &str) -> DomainError {
    from_status(status, parse_error_body(body_text).as_ref())
}

/// Translate a thrown transport error: timeouts, connectivity, and decode
/// failures. Anything unclassified becomes `Unknown`.
#[must_use]
pub fn from_transport(err: &reqwest::Error) -> DomainError {
    if err.is_timeout() {
        return DomainError::new(ErrorKind::Timeout, "request timed out");
    }
    if err.is_connect() || err.is_request() {
        return DomainError::new(ErrorKind::Network, "network unreachable")
            .with_details(err.to_string());
    }
    if err.is_decode() {
        return DomainError::new(ErrorKind::Unknown, "response body could not be decoded")
            .with_details(err.to_string());
    }
    DomainError::new(ErrorKind::Unknown, "request failed").with_details(err.to_string())
}
