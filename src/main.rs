//! Crawl Console main entry point
//!
//! This is the command-line interface for configuring, running and
//! monitoring web crawls.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crawl_console::api::{ApiClient, ExportFormat, ExportOptions, JobPatch};
use crawl_console::config::{load_config_with_hash, validate, AppConfig, NumericField};
use crawl_console::output::{
    outcome_line, print_job, print_job_overview, print_progress, progress_line,
};
use crawl_console::state::{JobAction, JobStore};
use crawl_console::storage::{open_storage, SqliteStore};
use crawl_console::url::{require_url, UrlHistory};
use crawl_console::{CrawlStatus, Dashboard};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Crawl Console: configure, run and monitor web crawls
///
/// `run` drives a local simulated crawl; the job commands talk to the
/// crawl backend over HTTP.
#[derive(Parser, Debug)]
#[command(name = "crawl-console")]
#[command(version)]
#[command(about = "Configure, run and monitor web crawls", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Crawl backend base URL (overrides the config file)
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// SQLite database for history and cached jobs (overrides the config file)
    #[arg(long, value_name = "PATH", global = true)]
    database: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a simulated crawl and follow its progress until it ends (Ctrl-C stops it)
    Run {
        /// URL to crawl
        #[arg(required_unless_present = "recent")]
        url: Option<String>,

        /// Crawl an entry of the URL history instead (0 is the newest)
        #[arg(long, value_name = "INDEX", conflicts_with = "url")]
        recent: Option<usize>,

        /// Maximum pages to crawl (1-1000)
        #[arg(long, value_name = "N")]
        max_pages: Option<String>,

        /// Maximum link depth (1-10)
        #[arg(long, value_name = "N")]
        max_depth: Option<String>,

        /// Delay between requests in milliseconds (500-5000)
        #[arg(long, value_name = "MS")]
        crawl_delay: Option<String>,

        /// Request timeout in milliseconds (5000-30000)
        #[arg(long, value_name = "MS")]
        timeout: Option<String>,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show or clear recently crawled URLs
    History {
        /// Forget every remembered URL
        #[arg(long)]
        clear: bool,
    },

    /// Show the effective configuration and exit
    Config,

    /// Check URLs locally and against the backend
    Validate {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// List crawl jobs known to the backend
    Jobs,

    /// Show one crawl job
    Job { id: String },

    /// Submit URLs to the backend as a new crawl job
    Submit {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Ask the backend to stop a crawl job
    StopJob { id: String },

    /// Download a job's results
    Export {
        job_id: String,

        /// json, csv, xlsx or markdown
        #[arg(long, default_value = "json")]
        format: ExportFormat,

        /// Destination file (defaults to crawl-<JOB_ID>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the backend is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(&cli)?;

    match cli.command {
        Command::Run {
            url,
            recent,
            max_pages,
            max_depth,
            crawl_delay,
            timeout,
            seed,
        } => {
            let overrides = [
                (NumericField::MaxPages, max_pages),
                (NumericField::MaxDepth, max_depth),
                (NumericField::CrawlDelayMs, crawl_delay),
                (NumericField::TimeoutMs, timeout),
            ];
            handle_run(&config, url, recent, &overrides, seed).await
        }
        Command::History { clear } => handle_history(&config, clear),
        Command::Config => {
            handle_config(&config, cli.config.as_deref());
            Ok(())
        }
        Command::Validate { urls } => handle_validate(&config, &urls).await,
        Command::Jobs => handle_jobs(&config).await,
        Command::Job { id } => handle_job(&config, &id).await,
        Command::Submit { urls } => handle_submit(&config, &urls).await,
        Command::StopJob { id } => handle_stop_job(&config, &id).await,
        Command::Export {
            job_id,
            format,
            output,
        } => handle_export(&config, job_id, format, output).await,
        Command::Health => handle_health(&config).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_console=info,warn"),
            1 => EnvFilter::new("crawl_console=debug,info"),
            2 => EnvFilter::new("crawl_console=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given and applies command-line overrides
fn load_settings(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => AppConfig::default(),
    };

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(path) = &cli.database {
        config.storage.database_path = path.display().to_string();
    }

    validate(&config)?;
    Ok(config)
}

fn open_store(config: &AppConfig) -> Result<SqliteStore> {
    let path = Path::new(&config.storage.database_path);
    open_storage(path).with_context(|| format!("Failed to open database {}", path.display()))
}

fn api_client(config: &AppConfig) -> Result<ApiClient> {
    Ok(ApiClient::new(&config.api)?)
}

/// Restores the cached job list, starting empty if it cannot be read
fn load_jobs(store: &SqliteStore) -> JobStore {
    JobStore::load(store).unwrap_or_else(|e| {
        tracing::warn!("Could not restore cached jobs: {}", e);
        JobStore::default()
    })
}

fn save_jobs(jobs: &JobStore, store: &mut SqliteStore) {
    if let Err(e) = jobs.save(store) {
        tracing::warn!("Could not cache jobs: {}", e);
    }
}

/// Handles `run`: drives a simulated crawl and prints every snapshot
async fn handle_run(
    config: &AppConfig,
    url: Option<String>,
    recent: Option<usize>,
    overrides: &[(NumericField, Option<String>)],
    seed: Option<u64>,
) -> Result<()> {
    let store = open_store(config)?;
    let mut simulator = config.simulator.clone();
    if seed.is_some() {
        simulator.seed = seed;
    }

    let mut dashboard = Dashboard::from_config(store, &simulator, config.crawl.clone());
    for (field, raw) in overrides {
        if let Some(raw) = raw {
            let value = dashboard.set_numeric_text(*field, raw);
            tracing::info!("{} set to {}", field.name(), value);
        }
    }

    let url = match (url, recent) {
        (Some(url), _) => url,
        (None, Some(index)) => dashboard
            .select_history(index)
            .with_context(|| format!("No URL history entry at index {}", index))?,
        (None, None) => bail!("A URL or --recent is required"),
    };

    let mut updates = dashboard.subscribe();
    dashboard.submit(&url)?;
    println!("Crawling {} (up to {} pages)\n", url, dashboard.config().max_pages);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let progress = updates.borrow_and_update().clone();
                println!("{}", progress_line(&progress));
                if progress.status != CrawlStatus::Running {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping crawl");
                dashboard.stop();
                break;
            }
        }
    }

    let progress = dashboard.progress();
    println!();
    print_progress(&progress);
    println!("\n{}", outcome_line(&progress));
    Ok(())
}

/// Handles `history`
fn handle_history(config: &AppConfig, clear: bool) -> Result<()> {
    let mut store = open_store(config)?;
    let mut history = UrlHistory::load(&store)?;

    if clear {
        history.clear();
        history.save(&mut store)?;
        println!("✓ URL history cleared");
        return Ok(());
    }

    if history.is_empty() {
        println!("No recent URLs");
        return Ok(());
    }

    println!("Recent URLs:");
    for (index, url) in history.entries().iter().enumerate() {
        println!("  {}. {}", index, url);
    }
    Ok(())
}

/// Handles `config`: shows the effective configuration
fn handle_config(config: &AppConfig, source: Option<&Path>) {
    println!("=== Crawl Console Configuration ===\n");
    match source {
        Some(path) => println!("Source: {}\n", path.display()),
        None => println!("Source: built-in defaults\n"),
    }

    let crawl = &config.crawl;
    println!("Crawl:");
    println!("  Max pages: {}", crawl.max_pages);
    println!("  Max depth: {}", crawl.max_depth);
    println!("  Respect robots.txt: {}", crawl.respect_robots_txt);
    println!("  Crawl delay: {}ms", crawl.crawl_delay_ms);
    println!("  Include external links: {}", crawl.include_external_links);
    let types: Vec<&str> = crawl.content_types.iter().map(String::as_str).collect();
    println!("  Content types: {}", types.join(", "));
    println!("  User agent: {}", crawl.user_agent);
    println!("  Timeout: {}ms", crawl.timeout_ms);

    println!("\nBackend:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Timeout: {}ms", config.api.timeout_ms);

    println!("\nSimulator:");
    println!("  Tick interval: {}ms", config.simulator.tick_interval_ms);
    match config.simulator.seed {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: random"),
    }

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles `validate`: local format check, then the backend's opinion
async fn handle_validate(config: &AppConfig, urls: &[String]) -> Result<()> {
    let mut accepted = Vec::new();
    for url in urls {
        match require_url(url) {
            Ok(_) => accepted.push(url.trim().to_string()),
            Err(e) => println!("✗ {}: {}", url, e),
        }
    }

    if accepted.is_empty() {
        return Ok(());
    }

    let client = api_client(config)?;
    match client.validate_urls(&accepted).await.into_result() {
        Ok(results) => {
            for result in results {
                if result.is_valid {
                    let status = result
                        .status
                        .map(|s| format!("HTTP {}", s))
                        .unwrap_or_else(|| "reachable".to_string());
                    match result.response_time {
                        Some(ms) => println!("✓ {}: {} in {}ms", result.url, status, ms),
                        None => println!("✓ {}: {}", result.url, status),
                    }
                } else {
                    let reason = result.error.unwrap_or_else(|| "not reachable".to_string());
                    println!("✗ {}: {}", result.url, reason);
                }
            }
        }
        Err(e) => {
            tracing::warn!("Backend validation unavailable: {}", e);
            for url in &accepted {
                println!("✓ {}: Valid URL (format only)", url);
            }
        }
    }
    Ok(())
}

/// Handles `jobs`: refreshes the cached job list from the backend
async fn handle_jobs(config: &AppConfig) -> Result<()> {
    let mut store = open_store(config)?;
    let mut jobs = load_jobs(&store);
    let client = api_client(config)?;

    jobs.dispatch(JobAction::SetLoading(true));
    let response = client.get_crawl_jobs().await;
    jobs.dispatch(JobAction::SetLoading(false));

    match response.into_result() {
        Ok(list) => {
            jobs.dispatch(JobAction::ClearError);
            jobs.dispatch(JobAction::SetJobs(list));
            save_jobs(&jobs, &mut store);
        }
        Err(e) => jobs.dispatch(JobAction::SetError(Some(e.to_string()))),
    }

    print_job_overview(&jobs);
    if let Some(error) = &jobs.error {
        println!("\nShowing cached jobs; refresh failed: {}", error);
    }
    Ok(())
}

/// Handles `job`
async fn handle_job(config: &AppConfig, id: &str) -> Result<()> {
    let client = api_client(config)?;
    let job = client.get_crawl_job(id).await.into_result()?;
    print_job(&job);

    let mut store = open_store(config)?;
    let mut jobs = load_jobs(&store);
    jobs.dispatch(JobAction::SetCurrentJob(Some(job)));
    save_jobs(&jobs, &mut store);
    Ok(())
}

/// Handles `submit`: every URL must pass the local check first
async fn handle_submit(config: &AppConfig, urls: &[String]) -> Result<()> {
    let mut accepted = Vec::with_capacity(urls.len());
    for url in urls {
        require_url(url).with_context(|| format!("Cannot submit '{}'", url))?;
        accepted.push(url.trim().to_string());
    }

    let client = api_client(config)?;
    let job = client.start_crawl(&accepted).await.into_result()?;
    println!("✓ Submitted job {} ({})", job.id, job.status);

    let mut store = open_store(config)?;
    let mut history = UrlHistory::load(&store).unwrap_or_default();
    for url in &accepted {
        history.record(url);
    }
    if let Err(e) = history.save(&mut store) {
        tracing::warn!("Could not save URL history: {}", e);
    }

    let mut jobs = load_jobs(&store);
    jobs.dispatch(JobAction::AddJob(job.clone()));
    jobs.dispatch(JobAction::SetCurrentJob(Some(job)));
    save_jobs(&jobs, &mut store);
    Ok(())
}

/// Handles `stop-job`, then refreshes the cached copy of the job
async fn handle_stop_job(config: &AppConfig, id: &str) -> Result<()> {
    let client = api_client(config)?;
    client.stop_crawl(id).await.into_result()?;
    println!("✓ Stop requested for job {}", id);

    match client.get_crawl_job(id).await.into_result() {
        Ok(job) => {
            let mut store = open_store(config)?;
            let mut jobs = load_jobs(&store);
            jobs.dispatch(JobAction::UpdateJob {
                id: job.id.clone(),
                patch: JobPatch {
                    status: Some(job.status),
                    updated_at: Some(job.updated_at),
                    completed_at: job.completed_at,
                    results_count: job.results_count,
                    ..Default::default()
                },
            });
            save_jobs(&jobs, &mut store);
            println!("  Status: {}", job.status);
        }
        Err(e) => tracing::warn!("Could not refresh job {}: {}", id, e),
    }
    Ok(())
}

/// Handles `export`: writes the backend's export to a file
async fn handle_export(
    config: &AppConfig,
    job_id: String,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let path = output
        .unwrap_or_else(|| PathBuf::from(format!("crawl-{}.{}", job_id, format.extension())));
    let options = ExportOptions {
        format,
        job_id,
        filename: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
    };

    let client = api_client(config)?;
    let bytes = client.export_results(&options).await.into_result()?;
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Exported {} bytes to: {}", bytes.len(), path.display());
    Ok(())
}

/// Handles `health`
async fn handle_health(config: &AppConfig) -> Result<()> {
    let client = api_client(config)?;
    match client.health_check().await.into_result() {
        Ok(health) => {
            println!("✓ Backend at {} is {}", client.base_url(), health.status);
            Ok(())
        }
        Err(e) => bail!("Backend at {} is unreachable: {}", client.base_url(), e),
    }
}
