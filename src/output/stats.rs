//! Run statistics
//!
//! The crawl calls return only what succeeded; these counters are how a run
//! tells "nothing matched" apart from "everything failed".

use crate::crawler::pipeline::ListingRun;
use crate::crawler::{CrawlBatch, ItemDocument};
use std::time::Duration;

/// Counters for one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    pub listing_pages_attempted: usize,
    pub listing_pages_fetched: usize,
    pub links_found: usize,
    pub items_attempted: usize,
    pub items_extracted: usize,
    pub item_fetch_failures: usize,
    pub items_empty: usize,
    pub elapsed: Duration,
}

impl RunStatistics {
    pub fn record_listing(&mut self, run: &ListingRun) {
        self.listing_pages_attempted += run.pages.attempted();
        self.listing_pages_fetched += run.pages.len();
        self.links_found += run.links.len();
    }

    pub fn record_items(&mut self, batch: &CrawlBatch<ItemDocument>) {
        self.items_attempted += batch.attempted();
        self.items_extracted += batch.len();
        self.item_fetch_failures += batch.fetch_failures();
        self.items_empty += batch.empty_extractions();
    }

    /// Percentage of attempted pages and items that produced output
    pub fn success_rate(&self) -> f64 {
        let attempted = self.listing_pages_attempted + self.items_attempted;
        if attempted == 0 {
            return 0.0;
        }
        let succeeded = self.listing_pages_fetched + self.items_extracted;
        (succeeded as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Listing Pages:");
    println!(
        "  Fetched: {} / {}",
        stats.listing_pages_fetched, stats.listing_pages_attempted
    );
    println!("  Links found: {}", stats.links_found);
    println!();

    println!("Item Pages:");
    println!(
        "  Extracted: {} / {}",
        stats.items_extracted, stats.items_attempted
    );
    println!("  Fetch failures: {}", stats.item_fetch_failures);
    println!("  Empty extractions: {}", stats.items_empty);
    println!();

    println!(
        "Success Rate: {:.1}% in {:.1}s",
        stats.success_rate(),
        stats.elapsed.as_secs_f64()
    );
}
