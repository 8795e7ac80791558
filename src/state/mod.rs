//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlStatus`: Lifecycle status of a crawl session (idle, running, paused, ...)
//! - `CrawlProgress`: The observable progress snapshot the console renders
//! - `JobStore`: The backend's job list, updated through a pure reducer

mod crawl_status;
pub mod job_store;
mod progress;

// Re-export main types
pub use crawl_status::CrawlStatus;
pub use job_store::{reduce, JobAction, JobStore, JobSummary};
pub use progress::CrawlProgress;
