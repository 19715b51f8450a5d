//! Adapter implementations of the external-interface traits.
//!
//! - [`HttpForumApi`]: the production HTTP client.
//! - [`mock`]: scripted in-memory backend for tests.

mod http_api;
pub mod mock;

pub use http_api::HttpForumApi;
