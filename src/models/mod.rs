//! Core data models for arXiv entries, search requests and downloads.

mod download;
mod paper;
mod search;

pub use download::{
    normalize_id, pdf_filename, sanitize_title, DownloadRequest, DownloadResult, MAX_TITLE_CHARS,
};
pub use paper::{ArxivEntry, Author, Link, PaperRecord, AFFILIATION_KEY};
pub use search::{SearchRequest, SortCriterion, SortOrder, DEFAULT_MAX_RESULTS};
