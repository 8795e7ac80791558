use crate::state::CrawlStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observable snapshot of a crawl session's progress
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlProgress {
    pub status: CrawlStatus,

    /// Pages the crawl will visit in total
    pub total_pages: u32,

    /// Pages visited so far, failures included
    pub crawled_pages: u32,

    /// Visited pages that failed
    pub failed_pages: u32,

    /// Discovered pages not yet visited
    pub queue_size: u32,

    pub current_url: Option<String>,

    pub start_time: Option<DateTime<Utc>>,

    pub elapsed_seconds: u64,

    pub estimated_remaining_seconds: Option<u64>,
}

impl CrawlProgress {
    /// Visited pages that did not fail
    pub fn successful_pages(&self) -> u32 {
        self.crawled_pages.saturating_sub(self.failed_pages)
    }

    /// Returns the completion percentage (0.0 to 100.0)
    pub fn percent_complete(&self) -> f64 {
        if self.total_pages == 0 {
            0.0
        } else {
            f64::from(self.crawled_pages) / f64::from(self.total_pages) * 100.0
        }
    }

    /// Returns the share of visited pages that succeeded (0.0 to 100.0)
    pub fn success_rate(&self) -> f64 {
        if self.crawled_pages == 0 {
            0.0
        } else {
            f64::from(self.successful_pages()) / f64::from(self.crawled_pages) * 100.0
        }
    }

    /// Checks the counter invariants every snapshot must satisfy
    pub fn is_consistent(&self) -> bool {
        self.crawled_pages <= self.total_pages && self.failed_pages <= self.crawled_pages
    }
}
