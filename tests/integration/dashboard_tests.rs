//! End-to-end tests of a console session backed by SQLite

use crawl_console::config::{parse_config, NumericField};
use crawl_console::crawler::{CrawlController, ScriptedDraws, TickDraws};
use crawl_console::state::{JobAction, JobStore};
use crawl_console::storage::SqliteStore;
use crawl_console::url::UrlHistory;
use crawl_console::{CrawlConfiguration, CrawlStatus, Dashboard, Transition};
use std::time::Duration;
use tempfile::TempDir;

fn steady_dashboard(store: SqliteStore) -> Dashboard<SqliteStore> {
    let controller = CrawlController::new(
        Duration::from_secs(2),
        ScriptedDraws::repeating(TickDraws::steady()),
    );
    Dashboard::new(store, controller, CrawlConfiguration::default())
}

#[tokio::test(start_paused = true)]
async fn test_crawl_runs_to_completion() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(&dir.path().join("console.db")).unwrap();
    let mut dashboard = steady_dashboard(store);
    dashboard.set_numeric_text(NumericField::MaxPages, "10");

    let mut updates = dashboard.subscribe();
    assert_eq!(dashboard.submit("https://example.com"), Ok(Transition::Applied));

    let mut snapshots = Vec::new();
    loop {
        updates.changed().await.unwrap();
        let progress = updates.borrow_and_update().clone();
        assert!(progress.is_consistent());
        let done = progress.status != CrawlStatus::Running;
        snapshots.push(progress);
        if done {
            break;
        }
    }

    let last = snapshots.last().unwrap();
    assert_eq!(last.status, CrawlStatus::Completed);
    assert_eq!(last.current_url, None);
    assert_eq!(last.estimated_remaining_seconds, Some(0));
    assert!(snapshots
        .windows(2)
        .all(|w| w[0].crawled_pages <= w[1].crawled_pages));
}

#[tokio::test(start_paused = true)]
async fn test_history_persists_across_sessions() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("console.db");

    {
        let mut dashboard = steady_dashboard(SqliteStore::new(&db).unwrap());
        dashboard.submit("https://example.com").unwrap();
        dashboard.stop();
        assert!(dashboard.submit("not a url").is_err());
        dashboard.submit("https://example.com").unwrap();
    }

    let store = SqliteStore::new(&db).unwrap();
    let history = UrlHistory::load(&store).unwrap();
    assert_eq!(history.entries(), ["https://example.com"]);

    let dashboard = steady_dashboard(store);
    assert_eq!(dashboard.history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pause_and_stop_during_crawl() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(&dir.path().join("console.db")).unwrap();
    let mut dashboard = steady_dashboard(store);

    dashboard.submit("https://example.com").unwrap();
    tokio::time::sleep(Duration::from_millis(4100)).await;
    assert_eq!(dashboard.pause(), Transition::Applied);
    let paused = dashboard.progress();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(dashboard.progress(), paused);

    assert_eq!(dashboard.stop(), Transition::Applied);
    let stopped = dashboard.progress();
    assert_eq!(stopped.status, CrawlStatus::Idle);
    assert_eq!(stopped.crawled_pages, paused.crawled_pages);
}

#[test]
fn test_job_store_persists_in_sqlite() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("console.db");
    let job = serde_json::from_value(serde_json::json!({
        "id": "job-1",
        "url": "https://example.com",
        "status": "completed",
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:05:00Z",
        "resultsCount": 3
    }))
    .unwrap();

    {
        let mut store = SqliteStore::new(&db).unwrap();
        let mut jobs = JobStore::default();
        jobs.dispatch(JobAction::AddJob(job));
        jobs.save(&mut store).unwrap();
    }

    let store = SqliteStore::new(&db).unwrap();
    let jobs = JobStore::load(&store).unwrap();
    assert_eq!(jobs.jobs.len(), 1);
    assert_eq!(jobs.jobs[0].results_count, Some(3));
}

#[test]
fn test_file_config_is_clamped() {
    let config = parse_config(
        r#"
[crawl]
max-pages = 5000
crawl-delay-ms = 10

[simulator]
tick-interval-ms = 250
seed = 7
"#,
    )
    .unwrap();

    assert_eq!(config.crawl.max_pages, 1000);
    assert_eq!(config.crawl.crawl_delay_ms, 500);
    assert_eq!(config.simulator.tick_interval_ms, 250);
    assert_eq!(config.simulator.seed, Some(7));
}
