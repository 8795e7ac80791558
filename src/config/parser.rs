use crate::config::types::AppConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Crawl parameters outside their bounds are clamped during parsing; the
/// remaining settings are validated and rejected when invalid.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(AppConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use crawl_console::config::load_config;
///
/// let config = load_config(Path::new("console.toml")).unwrap();
/// println!("Max pages: {}", config.crawl.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(AppConfig, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawl]
max-pages = 200
max-depth = 4
respect-robots-txt = false
crawl-delay-ms = 750
user-agent = "TestCrawler/2.0"

[api]
base-url = "https://crawler.example.com/api"

[simulator]
tick-interval-ms = 500
seed = 7

[storage]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.max_pages, 200);
        assert_eq!(config.crawl.max_depth, 4);
        assert!(!config.crawl.respect_robots_txt);
        assert_eq!(config.crawl.crawl_delay_ms, 750);
        assert_eq!(config.crawl.timeout_ms, 10000);
        assert_eq!(config.crawl.user_agent, "TestCrawler/2.0");
        assert_eq!(config.api.base_url, "https://crawler.example.com/api");
        assert_eq!(config.simulator.tick_interval_ms, 500);
        assert_eq!(config.simulator.seed, Some(7));
        assert_eq!(config.storage.database_path, "./test.db");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.max_pages, 50);
        assert_eq!(config.api.base_url, "http://localhost:3001/api");
        assert_eq!(config.simulator.tick_interval_ms, 2000);
        assert_eq!(config.simulator.seed, None);
    }

    #[test]
    fn test_out_of_range_crawl_values_are_clamped() {
        let file = create_temp_config(
            r#"
[crawl]
max-pages = 100000
timeout-ms = -5
"#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawl.max_pages, 1000);
        assert_eq!(config.crawl.timeout_ms, 5000);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/console.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config(
            r#"
[simulator]
tick-interval-ms = 5
"#,
        );
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_load_config_with_hash() {
        let file1 = create_temp_config("[crawl]\nmax-pages = 10\n");
        let file2 = create_temp_config("[crawl]\nmax-pages = 20\n");

        let (config1, hash1) = load_config_with_hash(file1.path()).unwrap();
        let (config2, hash2) = load_config_with_hash(file2.path()).unwrap();

        assert_eq!(config1.crawl.max_pages, 10);
        assert_eq!(config2.crawl.max_pages, 20);
        assert_ne!(hash1, hash2);
    }
}
