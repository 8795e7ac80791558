//! Terminal output for the console
//!
//! This module handles:
//! - Rendering crawl progress snapshots
//! - Rendering the job overview and job details

mod jobs;
mod progress;

pub use jobs::{print_job, print_job_overview, render_job_overview, render_job_row, RECENT_JOBS};
pub use progress::{
    format_duration, outcome_line, print_progress, progress_line, render_progress,
};
