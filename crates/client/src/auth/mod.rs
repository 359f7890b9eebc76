//! Token lifecycle: in-memory store, wire types, and persisted storage.

mod storage;
mod token_store;
mod types;

pub use storage::{MemorySettingsStore, SettingsStore, TokenStorage};
pub use token_store::TokenStore;
pub use types::{Credentials, TokenResponse};

pub(crate) use types::RefreshRequest;
