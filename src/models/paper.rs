//! Paper models: the provider's entry and the record returned to tool callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Extension key under which the provider exposes an author affiliation
pub const AFFILIATION_KEY: &str = "arxiv_affiliation";

/// An author as listed on an arXiv entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Full display name
    pub name: String,

    /// Affiliations listed for this author, in feed order
    #[serde(default)]
    pub affiliations: Vec<String>,
}

impl Author {
    /// Create an author without affiliations
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            affiliations: Vec::new(),
        }
    }
}

/// A link attached to an entry (abstract page, PDF, DOI)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: Option<String>,
    pub title: Option<String>,
    pub content_type: Option<String>,
}

/// One result as returned by the paper index.
///
/// This is the provider-facing shape: it carries more than a [`PaperRecord`]
/// exposes, including the raw `arxiv_*` extension values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivEntry {
    /// Canonical entry identifier, e.g. `http://arxiv.org/abs/2301.12345v1`
    pub entry_id: String,

    pub title: String,

    pub authors: Vec<Author>,

    pub summary: String,

    pub published: DateTime<Utc>,

    pub updated: Option<DateTime<Utc>>,

    /// Category terms in feed order
    pub categories: Vec<String>,

    pub primary_category: Option<String>,

    pub comment: Option<String>,

    pub journal_ref: Option<String>,

    pub doi: Option<String>,

    /// Direct PDF link, if the feed provided one
    pub pdf_url: Option<String>,

    pub links: Vec<Link>,

    /// Raw provider extension values keyed by their flattened name
    /// (`arxiv_comment`, `arxiv_affiliation`, ...)
    #[serde(default)]
    pub extensions: HashMap<String, String>,
}

impl ArxivEntry {
    /// Create an entry with only the required fields set
    pub fn new(
        entry_id: impl Into<String>,
        title: impl Into<String>,
        published: DateTime<Utc>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            title: title.into(),
            authors: Vec::new(),
            summary: String::new(),
            published,
            updated: None,
            categories: Vec::new(),
            primary_category: None,
            comment: None,
            journal_ref: None,
            doi: None,
            pdf_url: None,
            links: Vec::new(),
            extensions: HashMap::new(),
        }
    }

    /// The short identifier (`2301.12345v1`) taken from the entry id
    pub fn short_id(&self) -> &str {
        match self.entry_id.find("/abs/") {
            Some(pos) => &self.entry_id[pos + 5..],
            None => &self.entry_id,
        }
    }

    /// Look up a raw extension value
    pub fn extension(&self, key: &str) -> Option<&str> {
        self.extensions.get(key).map(String::as_str)
    }
}

/// A flat search result record, as returned by the `search_papers` tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,

    pub pdf_url: Option<String>,

    pub authors: Vec<String>,

    pub summary: String,

    /// Publication date as `YYYY-MM-DD`
    pub published: String,

    pub categories: Vec<String>,

    pub entry_id: String,

    pub comment: Option<String>,

    /// Best-effort: only present when the provider supplied the extension field
    pub affiliation: Option<String>,
}

impl From<ArxivEntry> for PaperRecord {
    fn from(entry: ArxivEntry) -> Self {
        let affiliation = entry.extension(AFFILIATION_KEY).map(str::to_string);

        Self {
            title: entry.title,
            pdf_url: entry.pdf_url,
            authors: entry.authors.into_iter().map(|a| a.name).collect(),
            summary: entry.summary,
            published: entry.published.format("%Y-%m-%d").to_string(),
            categories: entry.categories,
            entry_id: entry.entry_id,
            comment: entry.comment,
            affiliation,
        }
    }
}
