use crate::storage::KeyValueStore;
use crate::CrawlError;
use serde::{Deserialize, Serialize};

/// Storage key for the persisted URL history
pub const HISTORY_KEY: &str = "crawl-url-history";

/// Maximum number of URLs kept
pub const MAX_HISTORY: usize = 10;

/// Recently submitted URLs, most recent first, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlHistory {
    entries: Vec<String>,
}

impl UrlHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from stored entries, dropping duplicates and
    /// anything past the size limit
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut history = Self::new();
        for entry in entries {
            if history.entries.len() == MAX_HISTORY {
                break;
            }
            if !history.contains(&entry) {
                history.entries.push(entry);
            }
        }
        history
    }

    /// Records an accepted URL
    ///
    /// A URL already present is left where it is. Returns true if the
    /// history changed.
    pub fn record(&mut self, url: &str) -> bool {
        if self.contains(url) {
            return false;
        }
        self.entries.insert(0, url.to_string());
        self.entries.truncate(MAX_HISTORY);
        true
    }

    /// Moves an existing entry to the front, as when picked from the list
    pub fn select(&mut self, index: usize) -> Option<&str> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        self.entries.insert(0, entry);
        self.entries.first().map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|e| e == url)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Restores the history saved in `store`, or an empty one
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, CrawlError> {
        match store.get(HISTORY_KEY)? {
            Some(json) => {
                let entries: Vec<String> = serde_json::from_str(&json)?;
                Ok(Self::from_entries(entries))
            }
            None => Ok(Self::new()),
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), CrawlError> {
        let json = serde_json::to_string(self)?;
        store.set(HISTORY_KEY, &json)?;
        Ok(())
    }
}
