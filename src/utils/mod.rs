//! Utility modules supporting provider clients.
//!
//! - [`HttpClient`]: shared reqwest client with the configured connect timeout and user agent

mod http;

pub use http::{HttpClient, USER_AGENT};
