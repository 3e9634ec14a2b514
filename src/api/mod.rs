//! HTTP client for the application platform.
//!
//! Covers the two endpoints a push needs: resource matching (which files
//! the platform already stores) and the application bits upload. Requests
//! are not retried; a failed request fails the push.

mod authenticated;
mod bits;
mod client;
mod resource_match;
mod types;

pub use authenticated::AuthenticatedClient;
pub use client::ApiClient;
pub use types::ApiError;
