//! HTTP transport.
//!
//! This module provides the request/response types shared by the session
//! client and the domain callers, plus the reqwest-backed client that sends them.

mod client;
pub(crate) mod endpoints;
mod request;
mod response;

pub(crate) use client::HttpClient;
pub use request::{ApiRequest, RequestBody};
pub use response::ApiResponse;
