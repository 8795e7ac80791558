//! Integration tests for Crawl Console

mod api_client_tests;
mod dashboard_tests;
