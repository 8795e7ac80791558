//! Crawl Console: configure and monitor web-crawl jobs
//!
//! This crate holds the crawl progress state machine that drives the console,
//! the configuration it is started with, the URL history, and a thin client
//! for the crawl backend's HTTP contract.

pub mod api;
pub mod config;
pub mod crawler;
pub mod dashboard;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Crawl Console operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
///
/// The display strings are the messages shown next to the URL input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("URL is required")]
    Empty,

    #[error("Invalid URL format")]
    Parse(String),

    #[error("URL must start with http:// or https://")]
    InvalidScheme(String),
}

/// Result type alias for Crawl Console operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{AppConfig, ConfigEditor, ConfigPatch, CrawlConfiguration};
pub use crawler::{CrawlController, CrawlMachine, Transition};
pub use dashboard::Dashboard;
pub use state::{CrawlProgress, CrawlStatus};
pub use url::{check_url, UrlCheck, UrlHistory};
