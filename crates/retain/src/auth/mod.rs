//! Credential types and persistence.
//!
//! This module provides the credential primitives used by the [`Session`]
//! client: login credentials, the access/refresh pair, the stores that persist
//! the pair, and the hook invoked when a session can no longer be recovered.
//!
//! [`Session`]: crate::Session

mod credentials;
mod logout;
pub mod store;
mod tokens;

pub use credentials::Credentials;
pub use logout::{LogoutHook, NoopLogout};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, NoopCredentialStore};
pub use tokens::{AccessToken, CredentialPair, RefreshToken};
