use crate::{UrlError, UrlResult};
use url::Url;

/// Outcome of checking user input as a crawl target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlCheck {
    /// Nothing entered yet; neither valid nor an error
    Empty,
    /// An absolute HTTP or HTTPS URL
    Valid(Url),
    /// Input that cannot be crawled
    Invalid(UrlError),
}

impl UrlCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Message shown next to the input; empty for neutral input
    pub fn message(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Valid(_) => "Valid URL".to_string(),
            Self::Invalid(e) => e.to_string(),
        }
    }
}

/// Checks whether input is an absolute HTTP or HTTPS URL
///
/// Whitespace-only input is neutral rather than invalid.
///
/// # Examples
///
/// ```
/// use crawl_console::url::{check_url, UrlCheck};
///
/// assert!(check_url("https://example.com").is_valid());
/// assert_eq!(check_url("   "), UrlCheck::Empty);
/// assert!(!check_url("not a url").is_valid());
/// ```
pub fn check_url(input: &str) -> UrlCheck {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return UrlCheck::Empty;
    }

    let url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(e) => return UrlCheck::Invalid(UrlError::Parse(e.to_string())),
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return UrlCheck::Invalid(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    UrlCheck::Valid(url)
}

/// Requires input to be a crawlable URL, treating empty input as an error
pub fn require_url(input: &str) -> UrlResult<Url> {
    match check_url(input) {
        UrlCheck::Valid(url) => Ok(url),
        UrlCheck::Empty => Err(UrlError::Empty),
        UrlCheck::Invalid(e) => Err(e),
    }
}
