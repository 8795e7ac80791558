//! Crawl session state machine
//!
//! Commands and ticks are applied here synchronously; the controller decides
//! when they happen.

use crate::config::CrawlConfiguration;
use crate::crawler::simulator::{self, TickDraws, INITIAL_QUEUE_CAP, SECONDS_PER_PAGE};
use crate::state::{CrawlProgress, CrawlStatus};
use crate::url::require_url;
use crate::UrlResult;
use chrono::{DateTime, Utc};
use url::Url;

/// Whether a command changed the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The command does not apply in the current status; nothing changed
    Ignored,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A single crawl session's progress plus the URL it targets
#[derive(Debug, Clone, Default)]
pub struct CrawlMachine {
    progress: CrawlProgress,
    target: Option<Url>,
}

impl CrawlMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> &CrawlProgress {
        &self.progress
    }

    pub fn status(&self) -> CrawlStatus {
        self.progress.status
    }

    /// The URL of the current or most recent crawl
    pub fn target(&self) -> Option<&Url> {
        self.target.as_ref()
    }

    /// Starts a crawl of `url` with fresh counters
    ///
    /// Invalid input is rejected before anything else, leaving the session
    /// untouched. Starting while a crawl is running or paused is ignored.
    pub fn start(
        &mut self,
        url: &str,
        config: &CrawlConfiguration,
        now: DateTime<Utc>,
    ) -> UrlResult<Transition> {
        let url = require_url(url)?;

        if !self.progress.status.can_start() {
            tracing::debug!("Start ignored while {}", self.progress.status);
            return Ok(Transition::Ignored);
        }

        let total = config.max_pages;
        self.progress = CrawlProgress {
            status: CrawlStatus::Running,
            total_pages: total,
            crawled_pages: 0,
            failed_pages: 0,
            queue_size: total.min(INITIAL_QUEUE_CAP),
            current_url: Some(url.to_string()),
            start_time: Some(now),
            elapsed_seconds: 0,
            estimated_remaining_seconds: Some(u64::from(total) * SECONDS_PER_PAGE),
        };
        tracing::info!("Crawl started: {} ({} pages)", url, total);
        self.target = Some(url);

        Ok(Transition::Applied)
    }

    /// Freezes a running crawl
    pub fn pause(&mut self) -> Transition {
        self.move_status(CrawlStatus::Running, CrawlStatus::Paused)
    }

    /// Continues a paused crawl without touching counters or start time
    pub fn resume(&mut self) -> Transition {
        self.move_status(CrawlStatus::Paused, CrawlStatus::Running)
    }

    /// Ends a running or paused crawl, keeping its last counters
    pub fn stop(&mut self) -> Transition {
        if !self.progress.status.is_active() {
            return Transition::Ignored;
        }
        self.progress.status = CrawlStatus::Idle;
        self.progress.current_url = None;
        tracing::info!(
            "Crawl stopped after {}/{} pages",
            self.progress.crawled_pages,
            self.progress.total_pages
        );
        Transition::Applied
    }

    /// Marks a running or paused crawl as failed
    pub fn fail(&mut self) -> Transition {
        if !self.progress.status.is_active() {
            return Transition::Ignored;
        }
        self.progress.status = CrawlStatus::Failed;
        self.progress.current_url = None;
        self.progress.estimated_remaining_seconds = None;
        tracing::warn!("Crawl failed after {} pages", self.progress.crawled_pages);
        Transition::Applied
    }

    /// Applies one simulated tick; ignored unless running
    pub fn tick(&mut self, draws: TickDraws, now: DateTime<Utc>) -> Transition {
        let target = match (&self.target, self.progress.status) {
            (Some(target), CrawlStatus::Running) => target,
            _ => return Transition::Ignored,
        };

        self.progress = simulator::advance(&self.progress, target, draws, now);
        tracing::debug!(
            "Tick: {}/{} crawled, {} failed, queue {}",
            self.progress.crawled_pages,
            self.progress.total_pages,
            self.progress.failed_pages,
            self.progress.queue_size
        );
        if self.progress.status == CrawlStatus::Completed {
            tracing::info!(
                "Crawl completed: {} pages crawled, {} failed",
                self.progress.crawled_pages,
                self.progress.failed_pages
            );
        }

        Transition::Applied
    }

    fn move_status(&mut self, from: CrawlStatus, to: CrawlStatus) -> Transition {
        if self.progress.status != from {
            return Transition::Ignored;
        }
        self.progress.status = to;
        tracing::info!("Crawl {} -> {}", from, to);
        Transition::Applied
    }
}
