use crate::config::types::{ApiConfig, AppConfig, SimulatorConfig, StorageConfig};
use crate::ConfigError;
use std::collections::BTreeSet;
use url::Url;

/// Shortest tick period the simulator accepts
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

/// Numeric fields of a crawl configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    MaxPages,
    MaxDepth,
    CrawlDelayMs,
    TimeoutMs,
}

impl NumericField {
    /// Inclusive bounds for the field
    pub fn bounds(&self) -> (i64, i64) {
        match self {
            Self::MaxPages => (1, 1000),
            Self::MaxDepth => (1, 10),
            Self::CrawlDelayMs => (500, 5000),
            Self::TimeoutMs => (5000, 30000),
        }
    }

    /// Value substituted for unparseable or zero text input
    pub fn fallback(&self) -> i64 {
        match self {
            Self::MaxPages | Self::MaxDepth => 1,
            Self::CrawlDelayMs => 1000,
            Self::TimeoutMs => 10000,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MaxPages => "max-pages",
            Self::MaxDepth => "max-depth",
            Self::CrawlDelayMs => "crawl-delay-ms",
            Self::TimeoutMs => "timeout-ms",
        }
    }

    pub fn all() -> [Self; 4] {
        [
            Self::MaxPages,
            Self::MaxDepth,
            Self::CrawlDelayMs,
            Self::TimeoutMs,
        ]
    }
}

/// Clamps a value into the field's inclusive bounds
pub fn clamp_field(field: NumericField, value: i64) -> i64 {
    let (min, max) = field.bounds();
    value.clamp(min, max)
}

/// Coerces raw text input for a numeric field into a valid value
///
/// The leading integer of the input is used (`"12px"` reads as 12). Input
/// with no leading integer, or reading as zero, becomes the field's fallback.
/// The result is then clamped into range.
pub fn coerce_numeric_input(field: NumericField, raw: &str) -> i64 {
    let value = match parse_leading_int(raw) {
        Some(v) if v != 0 => v,
        _ => field.fallback(),
    };
    clamp_field(field, value)
}

/// Parses an optionally signed run of digits at the start of the input
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    // Overlong input saturates; clamping brings it back into range anyway
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Trims and lowercases MIME types, then drops empty entries and duplicates
pub fn normalize_content_types<I>(types: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    types
        .into_iter()
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Validates the parts of the configuration that cannot be clamped
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_simulator_config(&config.simulator)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates backend connection settings
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "api timeout-ms must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Validates simulator settings
fn validate_simulator_config(config: &SimulatorConfig) -> Result<(), ConfigError> {
    if config.tick_interval_ms < MIN_TICK_INTERVAL_MS {
        return Err(ConfigError::Validation(format!(
            "tick-interval-ms must be >= {}ms, got {}ms",
            MIN_TICK_INTERVAL_MS, config.tick_interval_ms
        )));
    }
    Ok(())
}

/// Validates storage settings
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
