//! Crawl backend API
//!
//! Request and response types for the backend's JSON contract, plus the
//! reqwest client that talks to it.

mod client;
mod types;

pub use client::{build_http_client, http_error_message, ApiClient};
pub use types::{
    ApiResponse, CrawlJob, ExportFormat, ExportOptions, HealthStatus, JobPatch, JobStatus,
    UrlValidationResult,
};
