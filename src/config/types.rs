use crate::config::validation::{clamp_field, normalize_content_types, NumericField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default user agent sent by crawl jobs
pub const DEFAULT_USER_AGENT: &str = "JumboWebCrawler/1.0";

/// Default backend base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

/// Main configuration structure for the console
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub crawl: CrawlConfiguration,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Parameters a crawl is started with
///
/// Numeric fields always lie within their documented bounds. Deserializing
/// goes through [`ConfigPatch`] so out-of-range file values are clamped
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "ConfigPatch")]
pub struct CrawlConfiguration {
    /// Maximum number of pages to crawl (1..=1000)
    pub max_pages: u32,

    /// Maximum link depth from the start URL (1..=10)
    pub max_depth: u32,

    pub respect_robots_txt: bool,

    /// Delay between requests in milliseconds (500..=5000)
    pub crawl_delay_ms: u64,

    pub include_external_links: bool,

    /// MIME types the crawl accepts
    pub content_types: BTreeSet<String>,

    /// User agent string, stored verbatim
    pub user_agent: String,

    /// Request timeout in milliseconds (5000..=30000)
    pub timeout_ms: u64,
}

impl Default for CrawlConfiguration {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_depth: 3,
            respect_robots_txt: true,
            crawl_delay_ms: 1000,
            include_external_links: false,
            content_types: BTreeSet::from(["text/html".to_string()]),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: 10000,
        }
    }
}

impl CrawlConfiguration {
    /// Merges a partial update into this configuration, clamping every
    /// numeric field into range
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(v) = patch.max_pages {
            self.max_pages = clamp_field(NumericField::MaxPages, v) as u32;
        }
        if let Some(v) = patch.max_depth {
            self.max_depth = clamp_field(NumericField::MaxDepth, v) as u32;
        }
        if let Some(v) = patch.respect_robots_txt {
            self.respect_robots_txt = v;
        }
        if let Some(v) = patch.crawl_delay_ms {
            self.crawl_delay_ms = clamp_field(NumericField::CrawlDelayMs, v) as u64;
        }
        if let Some(v) = patch.include_external_links {
            self.include_external_links = v;
        }
        if let Some(types) = patch.content_types {
            self.content_types = normalize_content_types(types);
        }
        if let Some(agent) = patch.user_agent {
            self.user_agent = agent;
        }
        if let Some(v) = patch.timeout_ms {
            self.timeout_ms = clamp_field(NumericField::TimeoutMs, v) as u64;
        }
    }

    /// Returns the current value of a numeric field
    pub fn numeric(&self, field: NumericField) -> i64 {
        match field {
            NumericField::MaxPages => i64::from(self.max_pages),
            NumericField::MaxDepth => i64::from(self.max_depth),
            NumericField::CrawlDelayMs => self.crawl_delay_ms as i64,
            NumericField::TimeoutMs => self.timeout_ms as i64,
        }
    }
}

impl From<ConfigPatch> for CrawlConfiguration {
    fn from(patch: ConfigPatch) -> Self {
        let mut config = Self::default();
        config.apply(patch);
        config
    }
}

/// A subset of configuration fields to merge into the current configuration
///
/// Numeric fields are signed and wide so any caller input can be represented;
/// range enforcement happens when the patch is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigPatch {
    pub max_pages: Option<i64>,
    pub max_depth: Option<i64>,
    pub respect_robots_txt: Option<bool>,
    pub crawl_delay_ms: Option<i64>,
    pub include_external_links: Option<bool>,
    pub content_types: Option<Vec<String>>,
    pub user_agent: Option<String>,
    pub timeout_ms: Option<i64>,
}

/// Crawl backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_ms: default_api_timeout_ms(),
        }
    }
}

/// Progress simulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimulatorConfig {
    /// Period between progress ticks in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Fixed seed for reproducible runs; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            seed: None,
        }
    }
}

/// Local key-value store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database holding history and the job list
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_api_timeout_ms() -> u64 {
    30_000
}

fn default_tick_interval_ms() -> u64 {
    2000
}

fn default_database_path() -> String {
    "./crawl-console.db".to_string()
}
