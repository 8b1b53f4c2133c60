//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl, dump and load cycle end-to-end.

use scp_catalog::config::{Config, SnapshotConfig, SourceConfig, SourceList};
use scp_catalog::crawler::format_user_agent;
use scp_catalog::output::{CrawlEvent, MemoryReporter};
use scp_catalog::CatalogService;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTENT: &str = "#page-content .content-panel";

/// Creates a test configuration crawling the given index paths on the mock server
fn create_test_config(base_url: &str, lists: &[(&str, &str)], snapshot: &str) -> Config {
    Config {
        source: SourceConfig {
            base_url: base_url.to_string(),
            code_prefix: "SCP".to_string(),
            content_selector: CONTENT.to_string(),
            lists: lists
                .iter()
                .map(|(index_path, category)| SourceList {
                    url: format!("{}{}", base_url, index_path),
                    category: category.to_string(),
                })
                .collect(),
        },
        snapshot: SnapshotConfig {
            path: snapshot.to_string(),
        },
        ..Config::default()
    }
}

fn index_page(items: &[(&str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(code, title)| {
            format!(
                "<li><a href=\"/{}\">{}</a> - {}</li>\n",
                code.to_lowercase(),
                code,
                title
            )
        })
        .collect();
    format!(
        r#"<html><body>
        <div id="side-bar"><a href="/scp-999">SCP-999</a> - Not Listed</div>
        <div id="page-content"><div class="content-panel"><ul>
        {}
        </ul></div></div>
        </body></html>"#,
        items
    )
}

fn detail_page(code: &str, class: &str, description: &str) -> String {
    format!(
        r#"<html><body><div id="page-content">
        <p><strong>Item #:</strong> {}</p>
        <p><strong>Object Class:</strong> {}</p>
        <p><strong>Special Containment Procedures:</strong> Keep it contained.</p>
        <p><strong>Description:</strong> {}</p>
        </div></body></html>"#,
        code, class, description
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts one index page with four references: two good, one missing, one without a class
async fn mount_series(server: &MockServer) {
    mount_page(
        server,
        "/scp-series",
        index_page(&[
            ("SCP-002", "The \"Living\" Room"),
            ("SCP-003", "Biological Motherboard"),
            ("SCP-004", "The 12 Rusty Keys and the Door"),
            ("SCP-005", "Skeleton Key"),
        ]),
    )
    .await;

    mount_page(
        server,
        "/scp-002",
        detail_page("SCP-002", "Keter", "A tumorous, fleshy growth."),
    )
    .await;
    mount_page(
        server,
        "/scp-003",
        detail_page("SCP-003", "Euclid", &"Motherboard. ".repeat(40)),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/scp-004"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    mount_page(
        server,
        "/scp-005",
        r#"<div id="page-content"><p><strong>Item #:</strong> SCP-005</p>
           <p><strong>Description:</strong> A key.</p></div>"#
            .to_string(),
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;
    mount_series(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("catalog.json");
    let config = create_test_config(
        &mock_server.uri(),
        &[("/scp-series", "series 1")],
        snapshot.to_str().unwrap(),
    );
    let reporter = Arc::new(MemoryReporter::new());
    let service = CatalogService::new(config, reporter.clone());

    let summary = service.crawl().await.unwrap();

    assert_eq!(summary.references_seen, 4);
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.entries_failed, 2);
    assert_eq!(summary.categories_failed, 0);
    assert!(summary.finished_at.is_some());

    let found = service.find("2");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "The \"Living\" Room");
    assert_eq!(found[0].class_tag, "Keter");
    assert_eq!(found[0].category, "series 1");
    assert_eq!(
        found[0].source_url,
        format!("{}/scp-002", mock_server.uri())
    );

    // Long descriptions are cut at a word boundary and marked
    let long = service.find("SCP-003");
    assert!(long[0].description.ends_with("..."));
    assert!(long[0].description.chars().count() <= 253);

    // The sidebar link is outside the content region
    assert!(service.find("999").is_empty());
    assert!(service.find("004").is_empty());
    assert!(service.find("005").is_empty());

    let failures: Vec<String> = reporter
        .events()
        .into_iter()
        .filter_map(|event| match event {
            CrawlEvent::EntryFailed { code, .. } => Some(code),
            _ => None,
        })
        .collect();
    assert_eq!(failures, vec!["SCP-004", "SCP-005"]);
}

#[tokio::test]
async fn test_second_crawl_skips_known_codes() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/series-1",
        index_page(&[("SCP-173", "The Sculpture")]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/scp-173"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page("SCP-173", "Euclid", "Concrete statue.")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), &[("/series-1", "series 1")], "unused.json");
    let service = CatalogService::new(config, Arc::new(MemoryReporter::new()));

    let first = service.crawl().await.unwrap();
    let second = service.crawl().await.unwrap();

    assert_eq!(first.inserted, 1);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.duplicates_skipped, 1);
    assert_eq!(service.catalog().lock().len(), 1);
}

#[tokio::test]
async fn test_failed_index_page_skips_only_its_category() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/joke-scps"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/archived-scps",
        "<html><body><p>Layout changed</p></body></html>".to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/scp-series",
        index_page(&[("SCP-049", "Plague Doctor")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/scp-049",
        detail_page("SCP-049", "Euclid", "Humanoid entity."),
    )
    .await;

    let config = create_test_config(
        &mock_server.uri(),
        &[
            ("/joke-scps", "joke"),
            ("/archived-scps", "archived"),
            ("/scp-series", "series 1"),
        ],
        "unused.json",
    );
    let reporter = Arc::new(MemoryReporter::new());
    let service = CatalogService::new(config, reporter.clone());

    let summary = service.crawl().await.unwrap();

    assert_eq!(summary.categories_total, 3);
    assert_eq!(summary.categories_failed, 2);
    assert_eq!(summary.inserted, 1);
    assert_eq!(service.find("49")[0].title, "Plague Doctor");

    let failed_categories = reporter
        .events()
        .iter()
        .filter(|event| matches!(event, CrawlEvent::CategoryFailed { .. }))
        .count();
    assert_eq!(failed_categories, 2);
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server.uri(), &[("/series-2", "series 2")], "unused.json");
    let agent = format_user_agent(&config.user_agent);

    Mock::given(method("GET"))
        .and(path("/series-2"))
        .and(header("user-agent", agent.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = CatalogService::new(config, Arc::new(MemoryReporter::new()));
    let summary = service.crawl().await.unwrap();

    assert_eq!(summary.categories_failed, 0);
    assert_eq!(summary.references_seen, 0);
}

#[tokio::test]
async fn test_crawl_dump_then_load() {
    let mock_server = MockServer::start().await;
    mount_series(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("catalog.json");
    let config = create_test_config(
        &mock_server.uri(),
        &[("/scp-series", "series 1")],
        snapshot.to_str().unwrap(),
    );

    let crawler = CatalogService::new(config.clone(), Arc::new(MemoryReporter::new()));
    crawler.crawl().await.unwrap();
    assert_eq!(crawler.dump().unwrap(), 2);

    let reporter = Arc::new(MemoryReporter::new());
    let reader = CatalogService::new(config, reporter.clone());
    assert_eq!(reader.load().unwrap(), 2);

    let before: Vec<_> = crawler
        .catalog()
        .lock()
        .iter()
        .cloned()
        .collect();
    let after: Vec<_> = reader.catalog().lock().iter().cloned().collect();
    assert_eq!(before, after);

    assert_eq!(
        reader.query("3").lines().next().map(|line| line.starts_with("Item Name: Biological Motherboard, Item #: SCP-003, Class: Euclid")),
        Some(true)
    );
    assert_eq!(
        reporter.messages(),
        vec!["Loading 2 entries from JSON", "Loading complete"]
    );
}

#[tokio::test]
async fn test_resumed_crawl_skips_snapshot_entries() {
    let mock_server = MockServer::start().await;
    mount_series(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("catalog.json");
    let config = create_test_config(
        &mock_server.uri(),
        &[("/scp-series", "series 1")],
        snapshot.to_str().unwrap(),
    );

    let first = CatalogService::new(config.clone(), Arc::new(MemoryReporter::new()));
    first.crawl().await.unwrap();
    first.dump().unwrap();

    let resumed = CatalogService::new(config, Arc::new(MemoryReporter::new()));
    resumed.load().unwrap();
    let summary = resumed.crawl().await.unwrap();

    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.duplicates_skipped, 2);
    assert_eq!(summary.entries_failed, 2);
    assert_eq!(resumed.catalog().lock().len(), 2);
}
