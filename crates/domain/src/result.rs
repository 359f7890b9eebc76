//! Tagged result type returned by every feature façade.

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Outcome of one logical API call, as consumed by UI state stores.
///
/// `Loading` is emitted by the surrounding store before a call starts when it
/// wants an intermediate state; the HTTP layer itself only ever produces
/// `Success` or `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "lowercase")]
pub enum ApiResult<T> {
    Success(T),
    Error(DomainError),
    Loading,
}

impl<T> ApiResult<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The success payload, if any.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The error value, if any.
    pub fn error(self) -> Option<DomainError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Map the success payload, leaving errors and loading untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Success(data) => ApiResult::Success(f(data)),
            Self::Error(err) => ApiResult::Error(err),
            Self::Loading => ApiResult::Loading,
        }
    }
}

impl<T> From<Result<T, DomainError>> for ApiResult<T> {
    fn from(result: Result<T, DomainError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Error(err),
        }
    }
}
