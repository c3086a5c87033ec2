//! Paper index providers.
//!
//! The [`PaperProvider`] trait is the seam between the tool layer and the
//! remote paper index. [`ArxivClient`] talks to the arXiv Atom export API;
//! [`MockProvider`] serves canned entries for tests.

mod arxiv;
pub mod mock;

pub use arxiv::{parse_feed, ArxivClient, FeedPage};
pub use mock::MockProvider;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;

use crate::models::{ArxivEntry, SearchRequest};

/// Lazily produced sequence of entries; pages are fetched as the stream is polled
pub type EntryStream<'a> = BoxStream<'a, Result<ArxivEntry, ProviderError>>;

/// Interface to an external paper index.
///
/// Implementations must yield entries in the order the index returns them
/// and never more than `request.max_results` of them.
#[async_trait]
pub trait PaperProvider: Send + Sync + std::fmt::Debug {
    /// Human-readable name of the provider
    fn name(&self) -> &str;

    /// Stream the entries matching a search request
    fn search<'a>(&'a self, request: &SearchRequest) -> EntryStream<'a>;

    /// Resolve a single identifier, `None` when the index has no such paper
    async fn lookup(&self, id: &str) -> Result<Option<ArxivEntry>, ProviderError> {
        let request = SearchRequest::by_id(id);
        self.search(&request).next().await.transpose()
    }

    /// Fetch the PDF bytes for an entry
    async fn fetch_pdf(&self, entry: &ArxivEntry) -> Result<Vec<u8>, ProviderError>;
}

/// Errors that can occur when talking to a provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The index answered with an error status or an error entry
    #[error("API error: {0}")]
    Api(String),

    /// The response could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

impl From<quick_xml::DeError> for ProviderError {
    fn from(err: quick_xml::DeError) -> Self {
        ProviderError::Parse(format!("XML: {}", err))
    }
}
