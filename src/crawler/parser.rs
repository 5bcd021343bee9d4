//! HTML extraction for listing and item pages
//!
//! Two capabilities are consumed by the crawler:
//! - `LinkExtractor`: item links out of a listing page
//! - `ContentExtractor`: the text of an item page
//!
//! The selector-based implementations here tolerate malformed markup: a
//! broken page yields fewer links or no content, never an error.

use crate::CrawlerError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose text is never part of extracted content
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Pulls item links out of listing page markup
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, markup: &str) -> Vec<String>;
}

/// Pulls the relevant text out of item page markup
///
/// `None` means there is nothing to extract; it is not an error.
pub trait ContentExtractor: Send + Sync {
    fn extract_text(&self, markup: &str) -> Option<String>;
}

impl<F> LinkExtractor for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn extract_links(&self, markup: &str) -> Vec<String> {
        self(markup)
    }
}

impl<F> ContentExtractor for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn extract_text(&self, markup: &str) -> Option<String> {
        self(markup)
    }
}

/// Compiles a CSS selector, mapping the parse error into `CrawlerError`
pub fn compile_selector(selector: &str) -> Result<Selector, CrawlerError> {
    Selector::parse(selector).map_err(|e| CrawlerError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Link extractor driven by a CSS selector
///
/// # Link Extraction Rules
///
/// **Include:** the `href` of every element matching the selector, in
/// document order, resolved against the base URL when one is set.
///
/// **Exclude:**
/// - empty and fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - `<a href="..." download>`
/// - with a base URL, anything that does not resolve to HTTP(S)
///
/// Duplicates are kept.
#[derive(Debug, Clone)]
pub struct SelectorLinkExtractor {
    selector: Selector,
    base_url: Option<Url>,
}

impl SelectorLinkExtractor {
    pub fn new(selector: &str, base_url: Option<Url>) -> Result<Self, CrawlerError> {
        Ok(Self {
            selector: compile_selector(selector)?,
            base_url,
        })
    }
}

impl LinkExtractor for SelectorLinkExtractor {
    fn extract_links(&self, markup: &str) -> Vec<String> {
        let document = Html::parse_document(markup);

        document
            .select(&self.selector)
            .filter(|element| element.value().attr("download").is_none())
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve_link(href, self.base_url.as_ref()))
            .collect()
    }
}

/// Resolves a link href and validates it
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: Option<&Url>) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let Some(base_url) = base_url else {
        return Some(href.to_string());
    };

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}

/// Content extractor driven by a CSS selector
///
/// Visible text of every matching element, whitespace collapsed, elements
/// separated by a blank line.
#[derive(Debug, Clone)]
pub struct SelectorContentExtractor {
    selector: Selector,
}

impl SelectorContentExtractor {
    pub fn new(selector: &str) -> Result<Self, CrawlerError> {
        Ok(Self {
            selector: compile_selector(selector)?,
        })
    }
}

impl ContentExtractor for SelectorContentExtractor {
    fn extract_text(&self, markup: &str) -> Option<String> {
        let document = Html::parse_document(markup);

        let blocks: Vec<String> = document
            .select(&self.selector)
            .map(visible_text)
            .filter(|text| !text.is_empty())
            .collect();

        if blocks.is_empty() {
            None
        } else {
            Some(blocks.join("\n\n"))
        }
    }
}

/// Collects the text of an element, skipping script-like descendants
fn visible_text(element: ElementRef<'_>) -> String {
    let mut words = Vec::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|el| HIDDEN_ELEMENTS.contains(&el.name()));
        if hidden {
            continue;
        }

        words.extend(text.split_whitespace());
    }

    words.join(" ")
}
