//! Authenticated HTTP pipeline for the Studia educational platform.
//!
//! Layering, leaf first:
//! - [`auth::TokenStore`] — in-memory source of truth for the current token
//!   pair, exposed as an observable value.
//! - [`errors`] — pure translation from transport failures (status codes,
//!   structured error bodies, reqwest errors) into the closed
//!   [`studia_domain::ErrorKind`] set.
//! - [`http::RequestPipeline`] — request building, bearer attachment, JSON
//!   codecs, and the one-shot token refresh + retry on 401.
//! - [`api`] — thin per-feature façades (auth, courses, tree, rooms,
//!   settings) mapping wire DTOs into domain records.
//!
//! No error ever crosses the pipeline boundary as a raw exception: every
//! failure surfaces as a `DomainError` inside [`studia_domain::ApiResult`].

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

pub use api::{AuthApi, CoursesApi, RoomsApi, SettingsApi, TreeApi};
pub use auth::{Credentials, MemorySettingsStore, SettingsStore, TokenStorage, TokenStore};
pub use config::ClientConfig;
pub use http::RequestPipeline;
