//! Job overview rendering

use crate::api::CrawlJob;
use crate::state::JobStore;

/// Jobs listed in the overview
pub const RECENT_JOBS: usize = 5;

/// One line per job: id, status, url and creation date
pub fn render_job_row(job: &CrawlJob) -> String {
    format!(
        "{:<12} {:<10} {}  (created {})",
        job.id,
        job.status,
        job.url,
        job.created_at.format("%Y-%m-%d")
    )
}

/// Renders the counts plus the most recent jobs
pub fn render_job_overview(store: &JobStore) -> Vec<String> {
    let summary = store.summary();
    let mut lines = vec![
        format!("Total jobs: {}", summary.total),
        format!("Running: {}", summary.running),
        format!("Completed: {}", summary.completed),
        format!("Failed: {}", summary.failed),
        String::new(),
    ];

    if store.jobs.is_empty() {
        lines.push("No jobs found".to_string());
    } else {
        lines.push("Recent jobs:".to_string());
        lines.extend(store.recent(RECENT_JOBS).iter().map(render_job_row));
    }
    lines
}

pub fn print_job_overview(store: &JobStore) {
    println!("=== Crawl Jobs ===\n");
    for line in render_job_overview(store) {
        println!("  {}", line);
    }
}

/// Prints every field of a single job
pub fn print_job(job: &CrawlJob) {
    println!("Job {}", job.id);
    println!("  URL: {}", job.url);
    println!("  Status: {}", job.status);
    println!("  Created: {}", job.created_at.to_rfc3339());
    println!("  Updated: {}", job.updated_at.to_rfc3339());
    if let Some(completed) = job.completed_at {
        println!("  Completed: {}", completed.to_rfc3339());
    }
    if let Some(count) = job.results_count {
        println!("  Results: {}", count);
    }
}
