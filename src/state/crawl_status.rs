/// Status definitions for a simulated crawl session
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the lifecycle status of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    /// No crawl has been started, or the last one was stopped
    #[default]
    Idle,

    /// Ticks are advancing the counters
    Running,

    /// Counters are frozen until the crawl is resumed
    Paused,

    // ===== Soft-terminal States =====
    /// Every page was crawled or the queue drained
    Completed,

    /// A collaborator reported the crawl as failed
    Failed,
}

impl CrawlStatus {
    /// Returns true for the states a session ends in on its own
    ///
    /// These are soft-terminal: a new start leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true while a crawl is in progress, paused or not
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// Returns true if a start command may begin a new crawl
    pub fn can_start(&self) -> bool {
        !self.is_active()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
