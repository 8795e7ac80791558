//! Text rendering of crawl progress snapshots

use crate::state::{CrawlProgress, CrawlStatus};

/// Formats seconds as `1h 2m 3s`, `2m 5s` or `7s`
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

fn status_label(status: CrawlStatus) -> String {
    let name = status.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders a snapshot as the lines of the progress panel
///
/// Elapsed time is only shown once it is non-zero, and the remaining-time
/// estimate only while the crawl is running.
pub fn render_progress(progress: &CrawlProgress) -> Vec<String> {
    if progress.status == CrawlStatus::Idle && progress.start_time.is_none() {
        return vec!["Ready to start crawling".to_string()];
    }

    let mut lines = vec![format!(
        "Status: {} ({:.0}% complete)",
        status_label(progress.status),
        progress.percent_complete()
    )];

    if let Some(url) = &progress.current_url {
        lines.push(format!("Currently crawling: {}", url));
    }

    lines.push(format!(
        "Successful: {}  Failed: {}",
        progress.successful_pages(),
        progress.failed_pages
    ));
    lines.push(format!(
        "Pages crawled: {} / {}",
        progress.crawled_pages, progress.total_pages
    ));
    lines.push(format!("Success rate: {:.0}%", progress.success_rate()));
    lines.push(format!("Queue size: {}", progress.queue_size));

    if progress.elapsed_seconds > 0 {
        lines.push(format!(
            "Elapsed time: {}",
            format_duration(progress.elapsed_seconds)
        ));
    }

    match progress.estimated_remaining_seconds {
        Some(remaining) if remaining > 0 && progress.status == CrawlStatus::Running => {
            lines.push(format!("Est. remaining: {}", format_duration(remaining)));
        }
        _ => {}
    }

    lines
}

/// One-line form used while a crawl is being followed on the terminal
pub fn progress_line(progress: &CrawlProgress) -> String {
    format!(
        "[{}] {}/{} pages ({} failed, queue {}) {}",
        progress.status,
        progress.crawled_pages,
        progress.total_pages,
        progress.failed_pages,
        progress.queue_size,
        format_duration(progress.elapsed_seconds)
    )
}

/// Closing line for a crawl that is no longer running
pub fn outcome_line(progress: &CrawlProgress) -> String {
    if progress.status.is_terminal() {
        format!(
            "Crawl {} after {}: {} pages crawled, {} failed",
            progress.status,
            format_duration(progress.elapsed_seconds),
            progress.crawled_pages,
            progress.failed_pages
        )
    } else {
        format!(
            "Crawl stopped at {} / {} pages",
            progress.crawled_pages, progress.total_pages
        )
    }
}

/// Prints a snapshot to stdout
pub fn print_progress(progress: &CrawlProgress) {
    println!("=== Crawl Progress ===\n");
    for line in render_progress(progress) {
        println!("  {}", line);
    }
}
