//! Listing and item crawls over real HTTP

use crate::create_test_config;
use pagesweep::crawler::pipeline::{collect_item_ids, run_items, run_listing};
use pagesweep::crawler::{Crawler, SkipReason};
use pagesweep::output::{write_documents_markdown, write_links};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing_page(ids: &[u32]) -> String {
    let links: String = ids
        .iter()
        .map(|id| format!(r#"<li><a class="item" href="/item?IDS={}">Law {}</a></li>"#, id, id))
        .collect();
    format!(
        r#"<html><body><a href="/about">About</a><ul>{}</ul></body></html>"#,
        links
    )
}

fn item_page(text: &str) -> String {
    format!(
        r#"<html><body><nav>Menu</nav><div id="content">{}</div></body></html>"#,
        text
    )
}

async fn mount_listing(mock_server: &MockServer, page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("page", page))
        .and(query_param("p", page))
        .and(query_param("size", "10"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

async fn mount_item(mock_server: &MockServer, id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/item"))
        .and(query_param("IDS", id))
        .respond_with(response)
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_listing_crawl_skips_failed_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(
        &mock_server,
        "1",
        ResponseTemplate::new(200).set_body_string(listing_page(&[11, 12])),
    )
    .await;
    mount_listing(&mock_server, "2", ResponseTemplate::new(500)).await;
    mount_listing(
        &mock_server,
        "3",
        ResponseTemplate::new(200).set_body_string(listing_page(&[31, 11])),
    )
    .await;

    let config = create_test_config(&base_url, "");
    let crawler = Crawler::from_config(&config).expect("Failed to build crawler");
    let listing = config.listing.as_ref().expect("Listing configured");

    let run = run_listing(&crawler, listing).await;

    assert_eq!(run.pages.len(), 2);
    assert_eq!(run.pages.skipped.len(), 1);
    assert_eq!(run.pages.skipped[0].key, "2");

    // Page order then document order, duplicates kept
    assert_eq!(
        run.links,
        vec![
            format!("{}/item?IDS=11", base_url),
            format!("{}/item?IDS=12", base_url),
            format!("{}/item?IDS=31", base_url),
            format!("{}/item?IDS=11", base_url),
        ]
    );
}

#[tokio::test]
async fn test_concurrent_listing_crawl_keeps_page_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(
        &mock_server,
        "1",
        ResponseTemplate::new(200)
            .set_body_string(listing_page(&[1]))
            .set_delay(Duration::from_millis(150)),
    )
    .await;
    mount_listing(
        &mock_server,
        "2",
        ResponseTemplate::new(200)
            .set_body_string(listing_page(&[2]))
            .set_delay(Duration::from_millis(50)),
    )
    .await;
    mount_listing(
        &mock_server,
        "3",
        ResponseTemplate::new(200).set_body_string(listing_page(&[3])),
    )
    .await;

    let config = create_test_config(&base_url, "[crawler]\nconcurrency = 3\n");
    let crawler = Crawler::from_config(&config).expect("Failed to build crawler");
    let listing = config.listing.as_ref().expect("Listing configured");

    let run = run_listing(&crawler, listing).await;

    assert_eq!(
        run.links,
        vec![
            format!("{}/item?IDS=1", base_url),
            format!("{}/item?IDS=2", base_url),
            format!("{}/item?IDS=3", base_url),
        ]
    );
}

#[tokio::test]
async fn test_item_crawl_keeps_only_extracted_pages() {
    let mock_server = MockServer::start().await;

    mount_item(
        &mock_server,
        "1",
        ResponseTemplate::new(200).set_body_string(item_page("Article 1. First law.")),
    )
    .await;
    mount_item(&mock_server, "2", ResponseTemplate::new(404)).await;
    mount_item(
        &mock_server,
        "3",
        ResponseTemplate::new(200)
            .set_body_string(r#"<html><body><p>No content block here</p></body></html>"#),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), "");
    let crawler = Crawler::from_config(&config).expect("Failed to build crawler");
    let ids = vec!["1".to_string(), "2".to_string(), "3".to_string()];

    let batch = run_items(&crawler, &config.items, &ids).await;

    assert_eq!(batch.len(), 1);
    assert_eq!(batch.items[0].id, "1");
    assert_eq!(batch.items[0].content, "Article 1. First law.");
    assert_eq!(
        batch.items[0].url,
        format!("{}/item?IDS=1", mock_server.uri())
    );

    assert_eq!(batch.fetch_failures(), 1);
    assert_eq!(batch.empty_extractions(), 1);
    assert!(matches!(batch.skipped[0].reason, SkipReason::Fetch(_)));
}

#[tokio::test]
async fn test_full_pipeline_writes_outputs() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(
        &mock_server,
        "1",
        ResponseTemplate::new(200).set_body_string(listing_page(&[5, 6])),
    )
    .await;
    mount_listing(
        &mock_server,
        "2",
        ResponseTemplate::new(200).set_body_string(listing_page(&[6, 7])),
    )
    .await;
    mount_listing(&mock_server, "3", ResponseTemplate::new(503)).await;

    // Each id is requested once even though 6 is linked twice
    mount_item(
        &mock_server,
        "5",
        ResponseTemplate::new(200).set_body_string(item_page("Five")),
    )
    .await;
    mount_item(
        &mock_server,
        "6",
        ResponseTemplate::new(200).set_body_string(item_page("Six")),
    )
    .await;
    mount_item(
        &mock_server,
        "7",
        ResponseTemplate::new(200).set_body_string(item_page("Seven")),
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let links_path = dir.path().join("links.txt");
    let documents_path = dir.path().join("documents.md");

    let config = create_test_config(&base_url, "");
    let crawler = Crawler::from_config(&config).expect("Failed to build crawler");
    let listing = config.listing.as_ref().expect("Listing configured");

    let run = run_listing(&crawler, listing).await;
    write_links(&run.links, &links_path).expect("Failed to write links");

    let ids = collect_item_ids(&config, Vec::new(), &run.links).expect("Failed to collect ids");
    assert_eq!(ids, vec!["5", "6", "7"]);

    let batch = run_items(&crawler, &config.items, &ids).await;
    write_documents_markdown(&batch.items, &documents_path).expect("Failed to write documents");

    let links = std::fs::read_to_string(&links_path).expect("Failed to read links");
    assert_eq!(links.lines().count(), 4);

    let documents = std::fs::read_to_string(&documents_path).expect("Failed to read documents");
    assert!(documents.contains("## Item 5\n"));
    assert!(documents.contains("Six"));
    assert!(documents.contains("Seven"));
    assert!(!documents.contains("Menu"));
}
