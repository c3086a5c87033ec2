//! arXiv provider implementation.

use async_stream::try_stream;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{EntryStream, PaperProvider, ProviderError};
use crate::config::ArxivConfig;
use crate::models::{ArxivEntry, Author, Link, SearchRequest, AFFILIATION_KEY};
use crate::utils::HttpClient;

/// Path fragment arXiv uses for the ids of error entries
const ERROR_ENTRY_MARKER: &str = "/api/errors";

/// One page of an arXiv Atom response
#[derive(Debug, Clone)]
pub struct FeedPage {
    /// `opensearch:totalResults`, when present
    pub total_results: Option<usize>,

    pub entries: Vec<ArxivEntry>,

    /// Entries present in the response but dropped as incomplete
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct RawFeed {
    // opensearch:totalResults
    #[serde(rename = "totalResults")]
    total_results: Option<RawCount>,

    #[serde(rename = "entry", default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawCount {
    #[serde(rename = "$text")]
    value: usize,
}

#[derive(Debug, Deserialize)]
struct RawText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: Option<String>,

    #[serde(default)]
    title: String,

    #[serde(default)]
    summary: String,

    published: Option<String>,

    updated: Option<String>,

    #[serde(rename = "author", default)]
    authors: Vec<RawAuthor>,

    #[serde(rename = "link", default)]
    links: Vec<RawLink>,

    #[serde(rename = "category", default)]
    categories: Vec<RawCategory>,

    // The arxiv: namespace elements are matched by local name
    primary_category: Option<RawCategory>,

    comment: Option<RawText>,

    journal_ref: Option<RawText>,

    doi: Option<RawText>,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    #[serde(default)]
    name: String,

    #[serde(rename = "affiliation", default)]
    affiliations: Vec<RawText>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    #[serde(rename = "@href")]
    href: String,

    #[serde(rename = "@rel")]
    rel: Option<String>,

    #[serde(rename = "@title")]
    title: Option<String>,

    #[serde(rename = "@type")]
    content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(rename = "@term")]
    term: String,
}

/// Parse an arXiv Atom response body.
///
/// An error entry (id under `/api/errors`) is reported as [`ProviderError::Api`]
/// carrying the entry's summary. Entries lacking an id or a valid published
/// date are skipped with a warning and counted in [`FeedPage::skipped`].
pub fn parse_feed(xml: &str) -> Result<FeedPage, ProviderError> {
    let feed: RawFeed = from_str(xml)
        .map_err(|e| ProviderError::Parse(format!("Failed to parse arXiv Atom feed: {}", e)))?;

    if let Some(error) = feed
        .entries
        .iter()
        .find(|e| e.id.as_deref().is_some_and(|id| id.contains(ERROR_ENTRY_MARKER)))
    {
        return Err(ProviderError::Api(collapse_whitespace(&error.summary)));
    }

    let mut entries = Vec::with_capacity(feed.entries.len());
    let mut skipped = 0;
    for raw in feed.entries {
        match convert_entry(raw) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping partial arXiv entry");
                skipped += 1;
            }
        }
    }

    Ok(FeedPage {
        total_results: feed.total_results.map(|c| c.value),
        entries,
        skipped,
    })
}

fn convert_entry(raw: RawEntry) -> Result<ArxivEntry, ProviderError> {
    let id = raw
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ProviderError::Parse("Entry has no id".to_string()))?
        .to_string();
    let published = raw
        .published
        .as_deref()
        .ok_or_else(|| ProviderError::Parse(format!("Entry {} has no published date", id)))
        .and_then(parse_timestamp)?;
    let updated = raw.updated.as_deref().map(parse_timestamp).transpose()?;

    let mut extensions = HashMap::new();

    let authors = raw
        .authors
        .into_iter()
        .map(|a| {
            let affiliations: Vec<String> = a
                .affiliations
                .into_iter()
                .map(|t| t.value.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            // Flattened like a raw feed dictionary: the last affiliation seen wins
            if let Some(last) = affiliations.last() {
                extensions.insert(AFFILIATION_KEY.to_string(), last.clone());
            }
            Author {
                name: a.name.trim().to_string(),
                affiliations,
            }
        })
        .collect();

    let comment = text_value(raw.comment);
    let journal_ref = text_value(raw.journal_ref);
    let doi = text_value(raw.doi);
    let primary_category = raw.primary_category.map(|c| c.term);

    for (key, value) in [
        ("arxiv_comment", &comment),
        ("arxiv_journal_ref", &journal_ref),
        ("arxiv_doi", &doi),
        ("arxiv_primary_category", &primary_category),
    ] {
        if let Some(value) = value {
            extensions.insert(key.to_string(), value.clone());
        }
    }

    let links: Vec<Link> = raw
        .links
        .into_iter()
        .map(|l| Link {
            href: l.href,
            rel: l.rel,
            title: l.title,
            content_type: l.content_type,
        })
        .collect();

    let pdf_url = links
        .iter()
        .find(|l| l.title.as_deref() == Some("pdf"))
        .or_else(|| {
            links
                .iter()
                .find(|l| l.content_type.as_deref() == Some("application/pdf"))
        })
        .map(|l| l.href.clone());

    Ok(ArxivEntry {
        entry_id: id,
        title: collapse_whitespace(&raw.title),
        authors,
        summary: raw.summary.trim().to_string(),
        published,
        updated,
        categories: raw.categories.into_iter().map(|c| c.term).collect(),
        primary_category,
        comment,
        journal_ref,
        doi,
        pdf_url,
        links,
        extensions,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ProviderError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| ProviderError::Parse(format!("Invalid timestamp '{}': {}", value, e)))
}

fn text_value(text: Option<RawText>) -> Option<String> {
    text.map(|t| collapse_whitespace(&t.value))
        .filter(|t| !t.is_empty())
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// arXiv provider
///
/// Supports:
/// - Paged search by query or id list
/// - PDF fetch
#[derive(Debug, Clone)]
pub struct ArxivClient {
    client: Arc<HttpClient>,
    api_url: String,
    pdf_base_url: String,
    page_size: usize,
    page_delay: Duration,
    api_timeout: Duration,
    pdf_timeout: Option<Duration>,
}

impl ArxivClient {
    /// Create a new arXiv client from configuration
    pub fn new(config: &ArxivConfig) -> Result<Self, ProviderError> {
        let client = HttpClient::from_config(config)?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: Arc<HttpClient>, config: &ArxivConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            pdf_base_url: config.pdf_base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.max(1),
            page_delay: config.page_delay(),
            api_timeout: config.timeout(),
            pdf_timeout: config.pdf_timeout(),
        }
    }

    /// Query parameters for one page of a search
    fn query_params(
        request: &SearchRequest,
        start: usize,
        max_results: usize,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("search_query", request.query.clone()),
            ("id_list", request.id_list.join(",")),
            ("sortBy", request.sort_by.api_value().to_string()),
            ("sortOrder", request.sort_order.api_value().to_string()),
            ("start", start.to_string()),
            ("max_results", max_results.to_string()),
        ]
    }

    async fn fetch_page(
        &self,
        request: &SearchRequest,
        start: usize,
        max_results: usize,
    ) -> Result<FeedPage, ProviderError> {
        tracing::debug!(
            url = %self.api_url,
            query = %request.query,
            start,
            max_results,
            "Requesting arXiv page"
        );

        let response = self
            .client
            .get(&self.api_url)
            .query(&Self::query_params(request, start, max_results))
            .header("Accept", "application/atom+xml")
            .timeout(self.api_timeout)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            // arXiv describes bad requests in an error entry; prefer that message
            return Err(match parse_feed(&body) {
                Err(ProviderError::Api(message)) if !message.is_empty() => {
                    ProviderError::Api(message)
                }
                _ => ProviderError::Api(format!("arXiv API returned status: {}", status)),
            });
        }

        parse_feed(&body)
    }

    /// PDF location for an entry, falling back to `<pdf_base_url>/<id>`
    pub fn pdf_url(&self, entry: &ArxivEntry) -> String {
        entry
            .pdf_url
            .clone()
            .unwrap_or_else(|| format!("{}/{}", self.pdf_base_url, entry.short_id()))
    }
}

#[async_trait]
impl PaperProvider for ArxivClient {
    fn name(&self) -> &str {
        "arXiv"
    }

    fn search<'a>(&'a self, request: &SearchRequest) -> EntryStream<'a> {
        let request = request.clone();

        Box::pin(try_stream! {
            if request.query.trim().is_empty() && request.id_list.is_empty() {
                Err::<(), _>(ProviderError::InvalidRequest(
                    "a search query or an id list is required".to_string(),
                ))?;
            }

            let limit = request.max_results;
            // `start` advances past skipped entries too; `yielded` counts toward the limit
            let mut start = 0usize;
            let mut yielded = 0usize;

            while yielded < limit {
                if start > 0 && !self.page_delay.is_zero() {
                    tokio::time::sleep(self.page_delay).await;
                }

                let remaining = limit - yielded;
                let page_size = remaining.min(self.page_size);
                let page = self.fetch_page(&request, start, page_size).await?;

                let received = page.entries.len() + page.skipped;
                if received == 0 {
                    break;
                }
                start += received;

                let total = page.total_results;
                for entry in page.entries.into_iter().take(remaining) {
                    yielded += 1;
                    yield entry;
                }

                if total.is_some_and(|t| start >= t) {
                    break;
                }
            }
        })
    }

    async fn fetch_pdf(&self, entry: &ArxivEntry) -> Result<Vec<u8>, ProviderError> {
        let url = self.pdf_url(entry);
        tracing::debug!(url = %url, "Fetching PDF");

        let mut builder = self.client.get(&url);
        if let Some(timeout) = self.pdf_timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to fetch PDF: {}", e)))?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "PDF request returned status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to read PDF: {}", e)))?;

        Ok(bytes.to_vec())
    }
}
