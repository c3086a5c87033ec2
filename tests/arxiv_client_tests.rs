//! arXiv client tests against a local mock HTTP server.

use arxiv_mcp_server::config::ArxivConfig;
use arxiv_mcp_server::models::{DownloadRequest, DownloadResult, SearchRequest};
use arxiv_mcp_server::{ArxivClient, Config, PaperProvider, PaperService, ProviderError};
use futures_util::TryStreamExt;
use mockito::Matcher;
use std::io::Write;
use std::sync::Arc;

fn test_config(base: &str, page_size: usize) -> ArxivConfig {
    ArxivConfig {
        api_url: format!("{}/api/query", base),
        pdf_base_url: format!("{}/pdf", base),
        page_size,
        page_delay_ms: 0,
        ..ArxivConfig::default()
    }
}

fn entry_xml(base: &str, id: &str, title: &str) -> String {
    format!(
        r#"  <entry>
    <id>http://arxiv.org/abs/{id}v1</id>
    <updated>2023-01-15T10:00:00Z</updated>
    <published>2023-01-15T10:00:00Z</published>
    <title>{title}</title>
    <summary>Abstract of {title}</summary>
    <author><name>Jane Doe</name></author>
    <link href="http://arxiv.org/abs/{id}v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="{base}/pdf/{id}v1" rel="related" type="application/pdf"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
"#
    )
}

fn feed_xml(total: usize, entries: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query</title>
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">{total}</opensearch:totalResults>
{}</feed>
"#,
        entries.concat()
    )
}

fn page_query(start: &str, max_results: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("start".into(), start.into()),
        Matcher::UrlEncoded("max_results".into(), max_results.into()),
    ])
}

#[tokio::test]
async fn test_search_pages_until_limit() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let first = server
        .mock("GET", "/api/query")
        .match_query(page_query("0", "2"))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(feed_xml(
            5,
            &[
                entry_xml(&base, "2301.00001", "One"),
                entry_xml(&base, "2301.00002", "Two"),
            ],
        ))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/api/query")
        .match_query(page_query("2", "1"))
        .with_status(200)
        .with_header("content-type", "application/atom+xml")
        .with_body(feed_xml(5, &[entry_xml(&base, "2301.00003", "Three")]))
        .create_async()
        .await;

    let client = ArxivClient::new(&test_config(&base, 2)).unwrap();
    let request = SearchRequest::new("cat:cs.LG").max_results(3);
    let entries: Vec<_> = client.search(&request).try_collect().await.unwrap();

    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two", "Three"]);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_search_stops_at_total_results() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let only = server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed_xml(1, &[entry_xml(&base, "2301.00001", "Only")]))
        .expect(1)
        .create_async()
        .await;

    let client = ArxivClient::new(&test_config(&base, 100)).unwrap();
    let entries: Vec<_> = client
        .search(&SearchRequest::new("rare").max_results(10))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    only.assert_async().await;
}

#[tokio::test]
async fn test_search_sends_sort_parameters() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let mock = server
        .mock("GET", "/api/query")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("search_query".into(), "all:electron".into()),
            Matcher::UrlEncoded("sortBy".into(), "relevance".into()),
            Matcher::UrlEncoded("sortOrder".into(), "ascending".into()),
        ]))
        .with_status(200)
        .with_body(feed_xml(0, &[]))
        .create_async()
        .await;

    let service = PaperService::new(
        Arc::new(ArxivClient::new(&test_config(&base, 100)).unwrap()),
        Arc::new(Config::new(".")),
    );
    let records = service
        .search(
            &SearchRequest::new("all:electron")
                .sort_by(arxiv_mcp_server::models::SortCriterion::Relevance)
                .sort_order(arxiv_mcp_server::models::SortOrder::Ascending),
        )
        .await
        .unwrap();

    assert!(records.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_bad_request_reports_api_message() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_abc</id>
    <title>Error</title>
    <summary>incorrect id format for abc</summary>
  </entry>
</feed>
"#,
        )
        .create_async()
        .await;

    let client = ArxivClient::new(&test_config(&server.url(), 100)).unwrap();
    let result: Result<Vec<_>, _> = client.search(&SearchRequest::by_id("abc")).try_collect().await;

    match result {
        Err(ProviderError::Api(message)) => assert_eq!(message, "incorrect id format for abc"),
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_server_error_reports_status() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let client = ArxivClient::new(&test_config(&server.url(), 100)).unwrap();
    let result: Result<Vec<_>, _> = client.search(&SearchRequest::new("q")).try_collect().await;

    match result {
        Err(ProviderError::Api(message)) => assert!(message.contains("503"), "{}", message),
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_download_writes_pdf() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let dir = tempfile::tempdir().unwrap();

    let lookup = server
        .mock("GET", "/api/query")
        .match_query(Matcher::UrlEncoded("id_list".into(), "2301.12345".into()))
        .with_status(200)
        .with_body(feed_xml(
            1,
            &[entry_xml(&base, "2301.12345", "Deep Learning: A Survey")],
        ))
        .create_async()
        .await;
    let pdf = server
        .mock("GET", "/pdf/2301.12345v1")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body(b"%PDF-1.5 test".to_vec())
        .create_async()
        .await;

    let service = PaperService::new(
        Arc::new(ArxivClient::new(&test_config(&base, 100)).unwrap()),
        Arc::new(Config::new(dir.path())),
    );
    let result = service
        .download(&DownloadRequest::new("arxiv.org/abs/2301.12345v3"))
        .await;

    let expected = dir.path().join("2301.12345_Deep_Learning__A_Survey.pdf");
    assert_eq!(result, DownloadResult::Saved(expected.clone()));
    assert_eq!(std::fs::read(&expected).unwrap(), b"%PDF-1.5 test");
    lookup.assert_async().await;
    pdf.assert_async().await;
}

#[tokio::test]
async fn test_download_unknown_id_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed_xml(0, &[]))
        .create_async()
        .await;

    let service = PaperService::new(
        Arc::new(ArxivClient::new(&test_config(&server.url(), 100)).unwrap()),
        Arc::new(Config::new(dir.path())),
    );
    let result = service.download(&DownloadRequest::new("2301.99999")).await;

    assert_eq!(
        result.to_string(),
        "Error: Paper with ID 2301.99999 not found."
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_pdf_error_status() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let dir = tempfile::tempdir().unwrap();

    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed_xml(1, &[entry_xml(&base, "2301.12345", "Gone")]))
        .create_async()
        .await;
    server
        .mock("GET", "/pdf/2301.12345v1")
        .with_status(404)
        .create_async()
        .await;

    let service = PaperService::new(
        Arc::new(ArxivClient::new(&test_config(&base, 100)).unwrap()),
        Arc::new(Config::new(dir.path())),
    );
    let result = service.download(&DownloadRequest::new("2301.12345")).await;

    assert!(!result.is_success());
    assert!(result
        .to_string()
        .starts_with("Error downloading paper: API error: PDF request returned status: 404"));
}

#[tokio::test]
async fn test_download_slow_pdf_outlives_api_timeout() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    let dir = tempfile::tempdir().unwrap();

    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed_xml(1, &[entry_xml(&base, "2301.12345", "Large Scans")]))
        .create_async()
        .await;
    server
        .mock("GET", "/pdf/2301.12345v1")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_chunked_body(|w| {
            for _ in 0..4 {
                w.write_all(&[b'x'; 1024])?;
                w.flush()?;
                std::thread::sleep(std::time::Duration::from_millis(500));
            }
            Ok(())
        })
        .create_async()
        .await;

    let config = ArxivConfig {
        timeout_secs: 1,
        ..test_config(&base, 100)
    };
    let service = PaperService::new(
        Arc::new(ArxivClient::new(&config).unwrap()),
        Arc::new(Config::new(dir.path())),
    );
    let result = service.download(&DownloadRequest::new("2301.12345")).await;

    let expected = dir.path().join("2301.12345_Large_Scans.pdf");
    assert_eq!(result, DownloadResult::Saved(expected.clone()));
    assert_eq!(std::fs::read(&expected).unwrap().len(), 4096);
}

#[tokio::test]
async fn test_search_keeps_complete_entries_next_to_partial_ones() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();

    let partial = "  <entry>\n    <title>Partial</title>\n  </entry>\n".to_string();
    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed_xml(
            3,
            &[
                entry_xml(&base, "2301.00001", "One"),
                partial,
                entry_xml(&base, "2301.00002", "Two"),
            ],
        ))
        .expect(1)
        .create_async()
        .await;

    let client = ArxivClient::new(&test_config(&base, 100)).unwrap();
    let entries: Vec<_> = client
        .search(&SearchRequest::new("q").max_results(10))
        .try_collect()
        .await
        .unwrap();

    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_download_partial_entry_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    server
        .mock("GET", "/api/query")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(feed_xml(
            1,
            &["  <entry><id>http://arxiv.org/abs/2301.99999</id></entry>\n".to_string()],
        ))
        .create_async()
        .await;

    let service = PaperService::new(
        Arc::new(ArxivClient::new(&test_config(&server.url(), 100)).unwrap()),
        Arc::new(Config::new(dir.path())),
    );
    let result = service.download(&DownloadRequest::new("2301.99999")).await;

    assert_eq!(
        result.to_string(),
        "Error: Paper with ID 2301.99999 not found."
    );
}
