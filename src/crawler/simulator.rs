//! Progress tick simulation
//!
//! A tick is a pure function of the previous snapshot, the crawl target, one
//! set of random draws and the current time. Randomness comes in through
//! [`DrawSource`], so a seeded or scripted source makes runs reproducible.

use crate::state::{CrawlProgress, CrawlStatus};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use url::Url;

/// A page is crawled when the advance draw exceeds this
pub const ADVANCE_THRESHOLD: f64 = 0.7;

/// A page fails when the fail draw exceeds this
pub const FAIL_THRESHOLD: f64 = 0.95;

/// Newly discovered pages join the queue when the bump draw exceeds this
pub const BUMP_THRESHOLD: f64 = 0.8;

/// Pages added to the queue by a bump
pub const QUEUE_BUMP: u32 = 2;

/// Estimated seconds per remaining page
pub const SECONDS_PER_PAGE: u64 = 2;

/// Largest queue a fresh crawl starts with
pub const INITIAL_QUEUE_CAP: u32 = 10;

/// One tick's worth of uniform draws in `[0, 1)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickDraws {
    pub advance: f64,
    pub fail: f64,
    pub bump: f64,
}

impl TickDraws {
    /// Draws that crawl a page without failures or queue growth
    pub fn steady() -> Self {
        Self {
            advance: 0.9,
            fail: 0.0,
            bump: 0.0,
        }
    }

    /// Draws that change nothing but the queue countdown
    pub fn idle() -> Self {
        Self {
            advance: 0.0,
            fail: 0.0,
            bump: 0.0,
        }
    }
}

/// Supplies random draws to the simulator
pub trait DrawSource: Send {
    fn next_draws(&mut self) -> TickDraws;
}

/// Draws from a seedable PRNG
pub struct SeededDraws {
    rng: StdRng,
}

impl SeededDraws {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl DrawSource for SeededDraws {
    fn next_draws(&mut self) -> TickDraws {
        TickDraws {
            advance: self.rng.random(),
            fail: self.rng.random(),
            bump: self.rng.random(),
        }
    }
}

/// Replays a fixed list of draws, then repeats a fallback forever
pub struct ScriptedDraws {
    script: VecDeque<TickDraws>,
    fallback: TickDraws,
}

impl ScriptedDraws {
    pub fn new<I>(script: I, fallback: TickDraws) -> Self
    where
        I: IntoIterator<Item = TickDraws>,
    {
        Self {
            script: script.into_iter().collect(),
            fallback,
        }
    }

    /// Repeats the same draws on every tick
    pub fn repeating(draws: TickDraws) -> Self {
        Self::new(Vec::new(), draws)
    }
}

impl DrawSource for ScriptedDraws {
    fn next_draws(&mut self) -> TickDraws {
        self.script.pop_front().unwrap_or(self.fallback)
    }
}

/// Builds the synthetic identifier of the page being crawled
pub fn page_url(target: &Url, page: u32) -> String {
    format!("{}/page-{}", target.as_str().trim_end_matches('/'), page)
}

/// Produces the snapshot that follows `progress` after one tick
///
/// Only running snapshots change; any other status is returned as-is.
pub fn advance(
    progress: &CrawlProgress,
    target: &Url,
    draws: TickDraws,
    now: DateTime<Utc>,
) -> CrawlProgress {
    if progress.status != CrawlStatus::Running {
        return progress.clone();
    }

    let mut next = progress.clone();

    next.elapsed_seconds = match progress.start_time {
        Some(start) => (now - start).num_seconds().max(0) as u64,
        None => progress.elapsed_seconds + 1,
    };

    let increment = u32::from(draws.advance > ADVANCE_THRESHOLD);
    next.crawled_pages = (progress.crawled_pages + increment).min(progress.total_pages);

    // Failures are a subset of crawled pages
    let failure = u32::from(draws.fail > FAIL_THRESHOLD);
    next.failed_pages = (progress.failed_pages + failure).min(next.crawled_pages);

    let bump = if draws.bump > BUMP_THRESHOLD {
        QUEUE_BUMP
    } else {
        0
    };
    next.queue_size = (progress.queue_size + bump).saturating_sub(1);

    if next.crawled_pages >= next.total_pages || next.queue_size == 0 {
        next.status = CrawlStatus::Completed;
        next.current_url = None;
        next.estimated_remaining_seconds = Some(0);
    } else {
        next.current_url = Some(page_url(target, next.crawled_pages + 1));
        next.estimated_remaining_seconds =
            Some(u64::from(next.total_pages - next.crawled_pages) * SECONDS_PER_PAGE);
    }

    next
}
