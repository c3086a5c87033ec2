//! The search and download operations behind the MCP tools and CLI commands.

use futures_util::{StreamExt, TryStreamExt};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{pdf_filename, DownloadRequest, DownloadResult, PaperRecord, SearchRequest};
use crate::provider::{PaperProvider, ProviderError};

/// Search and download operations over a provider and a storage directory
#[derive(Debug, Clone)]
pub struct PaperService {
    provider: Arc<dyn PaperProvider>,
    config: Arc<Config>,
}

impl PaperService {
    pub fn new(provider: Arc<dyn PaperProvider>, config: Arc<Config>) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a search and flatten every result into a [`PaperRecord`].
    ///
    /// Records keep the provider's order. Provider errors are returned as is,
    /// even when some results were already received.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<PaperRecord>, ProviderError> {
        tracing::info!(
            query = %request.query,
            max_results = request.max_results,
            sort_by = ?request.sort_by,
            sort_order = ?request.sort_order,
            "Searching {}",
            self.provider.name()
        );

        let records: Vec<PaperRecord> = self
            .provider
            .search(request)
            .take(request.max_results)
            .map_ok(PaperRecord::from)
            .try_collect()
            .await?;

        tracing::info!(count = records.len(), "Search complete");
        Ok(records)
    }

    /// Resolve a paper and write its PDF into the storage directory
    pub async fn download(&self, request: &DownloadRequest) -> DownloadResult {
        let paper_id = request.normalized_id();

        match self.save_pdf(&paper_id).await {
            Ok(Some(path)) => {
                tracing::info!(paper_id = %paper_id, path = %path.display(), "Paper downloaded");
                DownloadResult::Saved(path)
            }
            Ok(None) => {
                tracing::warn!(paper_id = %request.paper_id, "Paper not found");
                DownloadResult::NotFound(request.paper_id.clone())
            }
            Err(e) => {
                tracing::warn!(paper_id = %paper_id, error = %e, "Download failed");
                DownloadResult::Failed(e.to_string())
            }
        }
    }

    async fn save_pdf(&self, paper_id: &str) -> Result<Option<PathBuf>, ProviderError> {
        if paper_id.is_empty() {
            return Ok(None);
        }

        let Some(entry) = self.provider.lookup(paper_id).await? else {
            return Ok(None);
        };

        let path = self
            .config
            .storage_path
            .join(pdf_filename(paper_id, &entry.title));

        let bytes = self.provider.fetch_pdf(&entry).await?;
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!(bytes = bytes.len(), path = %path.display(), "Wrote PDF");
        Ok(Some(path))
    }
}
