//! HTTP client functionality for loadspread
//!
//! One pooled `reqwest` client is shared by every concurrent request in a
//! batch. The [`HttpClient`] trait is the seam the engine talks to, so the
//! network can be swapped out in tests.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpClient, HttpManager};
pub use config::HttpConfig;
pub use errors::HttpError;
pub use types::{HttpMethod, HttpMethodError, HttpResponse};
