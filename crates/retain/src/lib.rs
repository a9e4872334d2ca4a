//! retain - client library for the student-retention prediction API
//!
//! All API calls flow through a [`Session`], which attaches the stored access
//! credential to each request and recovers from credential expiry through a
//! single shared refresh exchange.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use retain::{ApiUrl, Credentials, MemoryCredentialStore, Session};
//!
//! # async fn example() -> Result<(), retain::Error> {
//! let api = ApiUrl::new("http://localhost:8000/api")?;
//! let session = Session::builder(api)
//!     .store(Arc::new(MemoryCredentialStore::new()))
//!     .build()?;
//!
//! session.auth().login(&Credentials::new("alice", "s3cret")).await?;
//!
//! for student in session.students().list().await? {
//!     println!("{}: {:?}", student.id, student.last_prediction);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod error;
pub mod http;
pub mod session;
pub mod types;

// Re-export primary types at crate root for convenience
pub use auth::{
    AccessToken, CredentialPair, CredentialStore, Credentials, FileCredentialStore, LogoutHook,
    MemoryCredentialStore, NoopCredentialStore, RefreshToken,
};
pub use error::Error;
pub use http::{ApiRequest, ApiResponse};
pub use session::{RequestOutcome, Session, SessionBuilder};
pub use types::ApiUrl;
