//! URL handling module for Crawl Console
//!
//! This module decides whether user input is a crawlable URL, keeps the list
//! of recently submitted URLs, and provides the debounce primitive used to
//! validate input while it is being typed.

mod check;
mod debounce;
mod history;

pub use check::{check_url, require_url, UrlCheck};
pub use debounce::Debouncer;
pub use history::{UrlHistory, HISTORY_KEY, MAX_HISTORY};
