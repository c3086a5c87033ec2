//! Search request model and sort options.

use serde::{Deserialize, Serialize};

/// Default number of results for a search
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Field by which the index orders search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    Relevance,
    LastUpdatedDate,
    #[default]
    SubmittedDate,
}

impl SortCriterion {
    /// Map a tool argument to a criterion.
    ///
    /// Unrecognized values fall back to [`SortCriterion::SubmittedDate`].
    pub fn from_arg(value: &str) -> Self {
        match value {
            "relevance" => SortCriterion::Relevance,
            "last_updated_date" => SortCriterion::LastUpdatedDate,
            "submitted_date" => SortCriterion::SubmittedDate,
            _ => SortCriterion::default(),
        }
    }

    /// Value of the `sortBy` query parameter
    pub fn api_value(&self) -> &'static str {
        match self {
            SortCriterion::Relevance => "relevance",
            SortCriterion::LastUpdatedDate => "lastUpdatedDate",
            SortCriterion::SubmittedDate => "submittedDate",
        }
    }
}

/// Sort order for search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// Map a tool argument to an order; anything unrecognized is descending
    pub fn from_arg(value: &str) -> Self {
        match value {
            "ascending" => SortOrder::Ascending,
            "descending" => SortOrder::Descending,
            _ => SortOrder::default(),
        }
    }

    /// Value of the `sortOrder` query parameter
    pub fn api_value(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// Search parameters passed to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query (may be empty when searching by id)
    pub query: String,

    /// Restrict results to these identifiers
    pub id_list: Vec<String>,

    /// Maximum number of results to return
    pub max_results: usize,

    pub sort_by: SortCriterion,

    pub sort_order: SortOrder,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            id_list: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
            sort_by: SortCriterion::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl SearchRequest {
    /// Create a new free-text search
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Create a lookup for exactly one identifier
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id_list: vec![id.into()],
            max_results: 1,
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set sort criterion
    pub fn sort_by(mut self, sort: SortCriterion) -> Self {
        self.sort_by = sort;
        self
    }

    /// Set sort order
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }
}
