//! Integration tests for Pagesweep
//!
//! These tests use wiremock to stand up mock listing and item servers and
//! exercise the crawler through real HTTP.

mod challenge_tests;
mod crawl_tests;

use pagesweep::config::{parse_config, Config};

/// Builds a configuration pointing every template at the mock server
pub fn create_test_config(base_url: &str, extra: &str) -> Config {
    let content = format!(
        r##"
[fetcher]
user-agent = "TestBot/1.0"
timeout-secs = 5
connect-timeout-secs = 2

[listing]
url-template = "{base}/list?page={{}}&p={{}}&size={{}}"
start-page = 1
last-page = 3
items-per-page = 10
link-selector = "a.item"
base-url = "{base}/"

[items]
url-template = "{base}/item?IDS={{}}"
id-pattern = 'IDS=(\d+)'
content-selector = "#content"

{extra}
"##,
        base = base_url,
        extra = extra
    );

    parse_config(&content).expect("Failed to parse test config")
}
