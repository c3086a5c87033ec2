//! # arXiv MCP Server
//!
//! A Model Context Protocol (MCP) server exposing two tools backed by the
//! arXiv API: `search_papers` and `download_paper`.
//!
//! ## Architecture
//!
//! - [`models`]: arXiv entries, flat paper records, search and download requests
//! - [`provider`]: the [`PaperProvider`] seam, the arXiv client and a mock
//! - [`service`]: the search and download operations
//! - [`mcp`]: tool registry and MCP server
//! - [`config`]: layered configuration (storage directory, client settings)
//! - [`utils`]: HTTP client

pub mod config;
pub mod mcp;
pub mod models;
pub mod provider;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use models::{ArxivEntry, PaperRecord};
pub use provider::{ArxivClient, PaperProvider, ProviderError};
pub use service::PaperService;
