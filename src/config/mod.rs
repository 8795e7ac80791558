//! Configuration module for Crawl Console
//!
//! This module handles the crawl parameters a simulated crawl is started with,
//! and loading the console's TOML configuration file.
//!
//! # Example
//!
//! ```no_run
//! use crawl_console::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("console.toml")).unwrap();
//! println!("Crawl will visit at most {} pages", config.crawl.max_pages);
//! ```

mod editor;
mod parser;
mod types;
mod validation;

pub use editor::ConfigEditor;
pub use types::{
    ApiConfig, AppConfig, ConfigPatch, CrawlConfiguration, SimulatorConfig, StorageConfig,
    DEFAULT_API_BASE_URL, DEFAULT_USER_AGENT,
};
pub use validation::{
    clamp_field, coerce_numeric_input, validate, NumericField, MIN_TICK_INTERVAL_MS,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
