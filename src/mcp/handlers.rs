//! Tool handlers for paper search and PDF download.

use serde_json::Value;

use super::tools::ToolHandler;
use crate::models::{DownloadRequest, SearchRequest, SortCriterion, SortOrder, DEFAULT_MAX_RESULTS};
use crate::service::PaperService;

/// Handler for the `search_papers` tool
#[derive(Debug)]
pub struct SearchPapersHandler {
    pub service: PaperService,
}

impl SearchPapersHandler {
    /// Build a search request from tool arguments, applying defaults and fallbacks
    pub fn parse_args(args: &Value) -> Result<SearchRequest, String> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'query' parameter")?;

        let max_results = args
            .get("max_results")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_MAX_RESULTS);

        let sort_by = args
            .get("sort_by")
            .and_then(|v| v.as_str())
            .map(SortCriterion::from_arg)
            .unwrap_or_default();

        let sort_order = args
            .get("sort_order")
            .and_then(|v| v.as_str())
            .map(SortOrder::from_arg)
            .unwrap_or_default();

        Ok(SearchRequest::new(query)
            .max_results(max_results)
            .sort_by(sort_by)
            .sort_order(sort_order))
    }
}

#[async_trait::async_trait]
impl ToolHandler for SearchPapersHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let request = Self::parse_args(&args)?;

        let records = self
            .service
            .search(&request)
            .await
            .map_err(|e| e.to_string())?;

        serde_json::to_value(records).map_err(|e| e.to_string())
    }
}

/// Handler for the `download_paper` tool
#[derive(Debug)]
pub struct DownloadPaperHandler {
    pub service: PaperService,
}

#[async_trait::async_trait]
impl ToolHandler for DownloadPaperHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let paper_id = args
            .get("paper_id")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'paper_id' parameter")?;

        // Failures are reported in the message, never as a tool error
        let result = self.service.download(&DownloadRequest::new(paper_id)).await;

        Ok(Value::String(result.to_string()))
    }
}
