//! Anti-bot challenge recovery over real HTTP

use crate::create_test_config;
use pagesweep::crawler::{Headers, PageFetcher};
use pagesweep::FetchError;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHALLENGE_WITH_TOKEN: &str = r#"<html><body>
    <h1 class="error-section__title">Checking your browser</h1>
    <script>var __arcsjs = "9f2c11ab";</script>
    </body></html>"#;

const CHALLENGE_WITHOUT_TOKEN: &str = r#"<html><body>
    <h1 class="error-section__title">Access denied</h1>
    </body></html>"#;

const REAL_PAGE: &str = r#"<html><body><div id="content">Real content</div></body></html>"#;

#[tokio::test]
async fn test_challenge_answered_with_cookie() {
    let mock_server = MockServer::start().await;

    // Retry carrying the token; mounted first so it wins over the catch-all
    Mock::given(method("GET"))
        .and(path("/item"))
        .and(header("cookie", "__arcsjs=9f2c11ab;"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REAL_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHALLENGE_WITH_TOKEN))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "");
    let fetcher = PageFetcher::from_config(&config).expect("Failed to build fetcher");

    let url = format!("{}/item?IDS=1", mock_server.uri());
    let body = fetcher
        .fetch(&url, &Headers::new())
        .await
        .expect("Fetch failed");

    assert_eq!(body, REAL_PAGE);
}

#[tokio::test]
async fn test_sha256_digest_token() {
    let mock_server = MockServer::start().await;

    // sha256("9f2c11ab")
    let expected_cookie = "__arcsjs=b933a7310c88b4f296e113b7430a64b162923cb01d076965636504927e697b9c;";

    Mock::given(method("GET"))
        .and(path("/item"))
        .and(header("cookie", expected_cookie))
        .respond_with(ResponseTemplate::new(200).set_body_string(REAL_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHALLENGE_WITH_TOKEN))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "[challenge]\ndigest = \"sha256\"\n");
    let fetcher = PageFetcher::from_config(&config).expect("Failed to build fetcher");

    let url = format!("{}/item?IDS=1", mock_server.uri());
    let body = fetcher.fetch(&url, &Headers::new()).await;

    assert_eq!(body.as_deref(), Ok(REAL_PAGE));
}

#[tokio::test]
async fn test_unsolvable_challenge_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header_exists("cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REAL_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHALLENGE_WITHOUT_TOKEN))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "");
    let fetcher = PageFetcher::from_config(&config).expect("Failed to build fetcher");

    let url = format!("{}/item?IDS=1", mock_server.uri());
    let result = fetcher.fetch(&url, &Headers::new()).await;

    assert_eq!(result, Err(FetchError::ChallengeUnsolved { url }));
}

#[tokio::test]
async fn test_retry_failure_status_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .and(header_exists("cookie"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHALLENGE_WITH_TOKEN))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "");
    let fetcher = PageFetcher::from_config(&config).expect("Failed to build fetcher");

    let url = format!("{}/item?IDS=1", mock_server.uri());
    let result = fetcher.fetch(&url, &Headers::new()).await;

    assert_eq!(result, Err(FetchError::Status { url, status: 403 }));
}

#[tokio::test]
async fn test_configured_headers_sent_on_first_attempt_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .and(header_exists("cookie"))
        .and(header_exists("accept-language"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .and(header_exists("cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REAL_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .and(header("accept-language", "fa-IR"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHALLENGE_WITH_TOKEN))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "");
    let fetcher = PageFetcher::from_config(&config).expect("Failed to build fetcher");
    let mut headers = Headers::new();
    headers.insert("accept-language".to_string(), "fa-IR".to_string());

    let url = format!("{}/item?IDS=1", mock_server.uri());
    let body = fetcher.fetch(&url, &headers).await;

    assert_eq!(body.as_deref(), Ok(REAL_PAGE));
}
