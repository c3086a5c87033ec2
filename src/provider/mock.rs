//! Mock provider for testing purposes.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures_util::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{EntryStream, PaperProvider, ProviderError};
use crate::models::{ArxivEntry, Author, SearchRequest};

#[derive(Debug, Default)]
struct MockState {
    search_results: Vec<ArxivEntry>,
    search_error: Option<String>,
    papers: HashMap<String, ArxivEntry>,
    lookup_error: Option<String>,
    pdfs: HashMap<String, Vec<u8>>,
    fetch_error: Option<String>,
    requests: Vec<SearchRequest>,
}

/// A mock provider that returns predefined responses and records the
/// search requests it receives.
#[derive(Debug, Default)]
pub struct MockProvider {
    state: Mutex<MockState>,
}

impl MockProvider {
    /// Create a new mock provider with no canned data
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the entries every search returns
    pub fn set_search_results(&self, entries: Vec<ArxivEntry>) {
        self.state().search_results = entries;
    }

    /// Make searches fail with a network error after yielding `search_results`
    pub fn fail_search(&self, message: impl Into<String>) {
        self.state().search_error = Some(message.into());
    }

    /// Register a paper for lookup under an id, with the PDF bytes to serve
    pub fn add_paper(&self, id: impl Into<String>, entry: ArxivEntry, pdf: Vec<u8>) {
        let mut state = self.state();
        let id = id.into();
        state.pdfs.insert(entry.entry_id.clone(), pdf);
        state.papers.insert(id, entry);
    }

    /// Make lookups fail with a network error
    pub fn fail_lookup(&self, message: impl Into<String>) {
        self.state().lookup_error = Some(message.into());
    }

    /// Make PDF fetches fail with a network error
    pub fn fail_fetch(&self, message: impl Into<String>) {
        self.state().fetch_error = Some(message.into());
    }

    /// Search requests received so far
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.state().requests.clone()
    }

    /// Clear all canned data and recorded requests
    pub fn reset(&self) {
        *self.state() = MockState::default();
    }
}

#[async_trait]
impl PaperProvider for MockProvider {
    fn name(&self) -> &str {
        "Mock Provider"
    }

    fn search<'a>(&'a self, request: &SearchRequest) -> EntryStream<'a> {
        let mut state = self.state();
        state.requests.push(request.clone());

        let mut items: Vec<Result<ArxivEntry, ProviderError>> = state
            .search_results
            .iter()
            .take(request.max_results)
            .cloned()
            .map(Ok)
            .collect();
        if let Some(message) = &state.search_error {
            items.push(Err(ProviderError::Network(message.clone())));
        }

        stream::iter(items).boxed()
    }

    async fn lookup(&self, id: &str) -> Result<Option<ArxivEntry>, ProviderError> {
        let state = self.state();
        if let Some(message) = &state.lookup_error {
            return Err(ProviderError::Network(message.clone()));
        }
        Ok(state.papers.get(id).cloned())
    }

    async fn fetch_pdf(&self, entry: &ArxivEntry) -> Result<Vec<u8>, ProviderError> {
        let state = self.state();
        if let Some(message) = &state.fetch_error {
            return Err(ProviderError::Network(message.clone()));
        }
        state
            .pdfs
            .get(&entry.entry_id)
            .cloned()
            .ok_or_else(|| ProviderError::Api(format!("No PDF for {}", entry.entry_id)))
    }
}

/// Helper function to create a mock entry for testing.
pub fn make_entry(id: &str, title: &str) -> ArxivEntry {
    let published = Utc
        .with_ymd_and_hms(2023, 1, 15, 10, 0, 0)
        .single()
        .unwrap_or_default();
    let mut entry = ArxivEntry::new(format!("http://arxiv.org/abs/{}v1", id), title, published);
    entry.authors = vec![Author::new("Test Author")];
    entry.summary = format!("Abstract of {}", title);
    entry.categories = vec!["cs.LG".to_string()];
    entry.pdf_url = Some(format!("http://arxiv.org/pdf/{}v1", id));
    entry
}
