//! Download request and result models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Maximum number of title characters kept in a generated filename
pub const MAX_TITLE_CHARS: usize = 50;

/// Request for downloading a paper PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Identifier as supplied by the caller: a bare id, a versioned id or a full URL
    pub paper_id: String,
}

impl DownloadRequest {
    /// Create a new download request
    pub fn new(paper_id: impl Into<String>) -> Self {
        Self {
            paper_id: paper_id.into(),
        }
    }

    /// The identifier with any path prefix and trailing version marker removed
    pub fn normalized_id(&self) -> String {
        normalize_id(&self.paper_id)
    }
}

/// Normalize a paper identifier.
///
/// Keeps the last `/`-separated segment, then strips a trailing version
/// marker (`v` followed only by digits):
///
/// - `"2301.12345"` -> `"2301.12345"`
/// - `"2301.12345v2"` -> `"2301.12345"`
/// - `"https://arxiv.org/abs/2301.12345v1"` -> `"2301.12345"`
pub fn normalize_id(raw: &str) -> String {
    let segment = raw.trim().rsplit('/').next().unwrap_or_default();

    let base = match segment.rfind('v') {
        Some(pos) if segment[pos + 1..].bytes().all(|b| b.is_ascii_digit()) => &segment[..pos],
        _ => segment,
    };

    base.to_string()
}

/// Replace every non-alphanumeric character with `_` and keep at most
/// [`MAX_TITLE_CHARS`] characters.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(MAX_TITLE_CHARS)
        .collect()
}

/// Filename a downloaded PDF is stored under: `<id>_<sanitized title>.pdf`
pub fn pdf_filename(paper_id: &str, title: &str) -> String {
    format!("{}_{}.pdf", paper_id, sanitize_title(title))
}

/// Outcome of a download operation.
///
/// Callers only ever see the [`Display`](fmt::Display) form; the variants
/// exist so the outcome can be inspected without parsing strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    /// The PDF was written to this path
    Saved(PathBuf),

    /// The index had no paper for the identifier (as originally supplied)
    NotFound(String),

    /// Lookup, fetch or write failed with this message
    Failed(String),
}

impl DownloadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadResult::Saved(_))
    }
}

impl fmt::Display for DownloadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadResult::Saved(path) => {
                write!(f, "Paper downloaded successfully to: {}", path.display())
            }
            DownloadResult::NotFound(paper_id) => {
                write!(f, "Error: Paper with ID {} not found.", paper_id)
            }
            DownloadResult::Failed(message) => write!(f, "Error downloading paper: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_id() {
        assert_eq!(normalize_id("2301.12345"), "2301.12345");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_id("https://arxiv.org/abs/2301.12345"), "2301.12345");
        assert_eq!(normalize_id("https://arxiv.org/pdf/2301.12345v3"), "2301.12345");
    }

    #[test]
    fn test_normalize_version_suffix() {
        assert_eq!(normalize_id("2301.12345v2"), "2301.12345");
        assert_eq!(normalize_id("2301.12345v"), "2301.12345");
        assert_eq!(normalize_id("2301.12345v12"), "2301.12345");
    }

    #[test]
    fn test_normalize_keeps_inner_v() {
        // Only a trailing version marker is removed
        assert_eq!(normalize_id("solv-int9901001"), "solv-int9901001");
        assert_eq!(normalize_id("solv-int9901001v2"), "solv-int9901001");
    }

    #[test]
    fn test_normalize_old_style_keeps_last_segment() {
        assert_eq!(normalize_id("hep-th/9901001v1"), "9901001");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_id(""), "");
        assert_eq!(normalize_id("https://arxiv.org/abs/"), "");
    }

    #[test]
    fn test_request_normalized_id() {
        let request = DownloadRequest::new("https://arxiv.org/abs/1706.03762v7");
        assert_eq!(request.normalized_id(), "1706.03762");
        assert_eq!(request.paper_id, "https://arxiv.org/abs/1706.03762v7");
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(
            sanitize_title("Attention Is All You Need!"),
            "Attention_Is_All_You_Need_"
        );
        assert_eq!(sanitize_title("Über-Modelle: 2.0"), "Über_Modelle__2_0");
    }

    #[test]
    fn test_sanitize_title_truncates() {
        let title = "A".repeat(80);
        assert_eq!(sanitize_title(&title).chars().count(), MAX_TITLE_CHARS);

        let unicode = "é".repeat(60);
        assert_eq!(sanitize_title(&unicode), "é".repeat(50));
    }

    #[test]
    fn test_pdf_filename() {
        assert_eq!(
            pdf_filename("1706.03762", "Attention Is All You Need"),
            "1706.03762_Attention_Is_All_You_Need.pdf"
        );
    }

    #[test]
    fn test_result_messages() {
        let saved = DownloadResult::Saved(PathBuf::from("/tmp/papers/x.pdf"));
        assert_eq!(
            saved.to_string(),
            "Paper downloaded successfully to: /tmp/papers/x.pdf"
        );
        assert!(saved.is_success());

        let missing = DownloadResult::NotFound("2301.12345".to_string());
        assert_eq!(
            missing.to_string(),
            "Error: Paper with ID 2301.12345 not found."
        );
        assert!(!missing.is_success());

        let failed = DownloadResult::Failed("connection reset".to_string());
        assert_eq!(
            failed.to_string(),
            "Error downloading paper: connection reset"
        );
    }
}
