use crate::config::types::{ConfigPatch, CrawlConfiguration};
use crate::config::validation::{coerce_numeric_input, NumericField};

/// Holds the configuration the next crawl will start with
#[derive(Debug, Clone, Default)]
pub struct ConfigEditor {
    config: CrawlConfiguration,
}

impl ConfigEditor {
    pub fn new(config: CrawlConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrawlConfiguration {
        &self.config
    }

    /// Merges a subset of fields into the current configuration
    pub fn update(&mut self, patch: ConfigPatch) {
        tracing::debug!("Applying configuration update: {:?}", patch);
        self.config.apply(patch);
    }

    /// Sets a numeric field from raw text input
    ///
    /// Returns the value actually stored after coercion.
    pub fn set_numeric_text(&mut self, field: NumericField, raw: &str) -> i64 {
        let value = coerce_numeric_input(field, raw);
        let patch = match field {
            NumericField::MaxPages => ConfigPatch {
                max_pages: Some(value),
                ..Default::default()
            },
            NumericField::MaxDepth => ConfigPatch {
                max_depth: Some(value),
                ..Default::default()
            },
            NumericField::CrawlDelayMs => ConfigPatch {
                crawl_delay_ms: Some(value),
                ..Default::default()
            },
            NumericField::TimeoutMs => ConfigPatch {
                timeout_ms: Some(value),
                ..Default::default()
            },
        };
        self.config.apply(patch);
        value
    }

    /// Restores every field to its default
    pub fn reset(&mut self) {
        tracing::debug!("Resetting configuration to defaults");
        self.config = CrawlConfiguration::default();
    }
}
