//! Domain types for the Studia educational platform client.
//!
//! This crate holds pure data: the domain error taxonomy, the tagged result
//! type surfaced to UI state stores, and the plain records for courses,
//! lessons, quizzes, technology trees, rooms, and user settings. It performs
//! no I/O and carries no transport concerns; the `studia-client` crate maps
//! wire DTOs into these types.

pub mod errors;
pub mod result;
pub mod types;

pub use errors::{DomainError, ErrorKind};
pub use result::ApiResult;
pub use types::*;
