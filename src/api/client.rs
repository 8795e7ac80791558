//! HTTP client for the crawl backend
//!
//! Every call resolves to an [`ApiResponse`]: network failures, non-2xx
//! statuses and undecodable bodies all come back as `success == false` with
//! a message, never as an error or a panic.

use crate::api::types::{
    ApiResponse, CrawlJob, ExportOptions, HealthStatus, UrlValidationResult, UrlsRequest,
};
use crate::config::ApiConfig;
use crate::CrawlError;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Builds the HTTP client used for backend calls
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let user_agent = format!("crawl-console/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats a non-2xx status the way the console reports it
pub fn http_error_message(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

/// Client for the crawl backend's REST endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the backend described by `config`
    pub fn new(config: &ApiConfig) -> Result<Self, CrawlError> {
        Self::with_base_url(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, CrawlError> {
        let client =
            build_http_client(timeout).map_err(|e| CrawlError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submits URLs for crawling
    pub async fn start_crawl(&self, urls: &[String]) -> ApiResponse<CrawlJob> {
        let request = self
            .client
            .post(self.endpoint("/crawl"))
            .json(&UrlsRequest { urls });
        self.send_json(request).await
    }

    pub async fn get_crawl_job(&self, job_id: &str) -> ApiResponse<CrawlJob> {
        let request = self.client.get(self.endpoint(&format!("/crawl/{}", job_id)));
        self.send_json(request).await
    }

    pub async fn get_crawl_jobs(&self) -> ApiResponse<Vec<CrawlJob>> {
        let request = self.client.get(self.endpoint("/crawl"));
        self.send_json(request).await
    }

    /// Asks the backend to stop a job; the response body is ignored
    pub async fn stop_crawl(&self, job_id: &str) -> ApiResponse<()> {
        let request = self
            .client
            .post(self.endpoint(&format!("/crawl/{}/stop", job_id)));
        match self.send(request).await {
            Ok(_) => ApiResponse::success(()),
            Err(message) => ApiResponse::failure(message),
        }
    }

    pub async fn validate_urls(&self, urls: &[String]) -> ApiResponse<Vec<UrlValidationResult>> {
        let request = self
            .client
            .post(self.endpoint("/validate"))
            .json(&UrlsRequest { urls });
        self.send_json(request).await
    }

    /// Downloads exported results as raw bytes
    pub async fn export_results(&self, options: &ExportOptions) -> ApiResponse<Vec<u8>> {
        let request = self.client.post(self.endpoint("/export")).json(options);
        let response = match self.send(request).await {
            Ok(response) => response,
            Err(message) => return ApiResponse::failure(message),
        };
        match response.bytes().await {
            Ok(bytes) => ApiResponse::success(bytes.to_vec()),
            Err(e) => ApiResponse::failure(e.to_string()),
        }
    }

    pub async fn health_check(&self) -> ApiResponse<HealthStatus> {
        let request = self.client.get(self.endpoint("/health"));
        self.send_json(request).await
    }

    /// Sends a request, turning transport failures and non-2xx statuses into
    /// the message reported to the caller
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, String> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("Backend request failed: {}", e);
            e.to_string()
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = http_error_message(status);
            tracing::warn!("Backend returned {}", message);
            return Err(message);
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResponse<T> {
        let response = match self.send(request).await {
            Ok(response) => response,
            Err(message) => return ApiResponse::failure(message),
        };
        match response.json::<T>().await {
            Ok(data) => ApiResponse::success(data),
            Err(e) => {
                tracing::warn!("Failed to decode backend response: {}", e);
                ApiResponse::failure(e.to_string())
            }
        }
    }
}
