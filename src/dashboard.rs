//! Console application state
//!
//! The dashboard owns everything one console session works with: the
//! configuration being edited, the crawl controller, the URL history and
//! the store it is persisted to.

use crate::config::{ConfigEditor, ConfigPatch, CrawlConfiguration, NumericField, SimulatorConfig};
use crate::crawler::{CrawlController, Transition};
use crate::state::{CrawlProgress, CrawlStatus};
use crate::storage::KeyValueStore;
use crate::url::{check_url, require_url, Debouncer, UrlCheck, UrlHistory};
use crate::UrlResult;
use std::time::Duration;
use tokio::sync::watch;

/// Quiet period before a draft URL is checked
pub const DRAFT_CHECK_DELAY: Duration = Duration::from_millis(300);

pub struct Dashboard<S: KeyValueStore> {
    editor: ConfigEditor,
    controller: CrawlController,
    history: UrlHistory,
    store: S,
    draft: Debouncer<String, UrlCheck>,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// Creates a dashboard, restoring the URL history from `store`
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(store: S, controller: CrawlController, config: CrawlConfiguration) -> Self {
        let history = UrlHistory::load(&store).unwrap_or_else(|e| {
            tracing::warn!("Could not restore URL history: {}", e);
            UrlHistory::new()
        });

        Self {
            editor: ConfigEditor::new(config),
            controller,
            history,
            store,
            draft: Debouncer::new(DRAFT_CHECK_DELAY, |input: String| check_url(&input)),
        }
    }

    /// Creates a dashboard whose controller follows `simulator`
    pub fn from_config(store: S, simulator: &SimulatorConfig, config: CrawlConfiguration) -> Self {
        Self::new(store, CrawlController::from_config(simulator), config)
    }

    /// Starts a crawl of `input` with the current configuration
    ///
    /// Invalid input is rejected without touching the crawl or the history.
    /// The URL is only recorded in the history when the crawl actually
    /// starts; a submit while a crawl is in progress leaves it unchanged.
    pub fn submit(&mut self, input: &str) -> UrlResult<Transition> {
        let url = require_url(input)?;
        let transition = self.controller.start(url.as_str(), self.editor.config())?;
        if transition.is_applied() {
            self.remember(input.trim());
        }
        Ok(transition)
    }

    fn remember(&mut self, url: &str) {
        if self.history.record(url) {
            self.persist_history();
        }
    }

    fn persist_history(&mut self) {
        if let Err(e) = self.history.save(&mut self.store) {
            tracing::warn!("Could not save URL history: {}", e);
        }
    }

    pub fn pause(&mut self) -> Transition {
        self.controller.pause()
    }

    pub fn resume(&mut self) -> Transition {
        self.controller.resume()
    }

    pub fn stop(&mut self) -> Transition {
        self.controller.stop()
    }

    pub fn fail(&mut self) -> Transition {
        self.controller.fail()
    }

    pub fn config(&self) -> &CrawlConfiguration {
        self.editor.config()
    }

    /// Edits the configuration used by the next start
    pub fn update_config(&mut self, patch: ConfigPatch) {
        self.editor.update(patch);
    }

    pub fn set_numeric_text(&mut self, field: NumericField, raw: &str) -> i64 {
        self.editor.set_numeric_text(field, raw)
    }

    pub fn reset_config(&mut self) {
        self.editor.reset();
    }

    pub fn history(&self) -> &UrlHistory {
        &self.history
    }

    /// Picks a history entry, moving it to the front; returns the URL
    pub fn select_history(&mut self, index: usize) -> Option<String> {
        let url = self.history.select(index)?.to_string();
        self.persist_history();
        Some(url)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist_history();
    }

    /// Feeds the URL being typed to the debounced check
    pub fn input_changed(&mut self, input: &str) {
        self.draft.call(input.to_string());
    }

    /// Result of the last debounced check, if one has run
    pub fn draft_check(&self) -> Option<UrlCheck> {
        self.draft.latest()
    }

    pub fn subscribe_draft(&self) -> watch::Receiver<Option<UrlCheck>> {
        self.draft.subscribe()
    }

    pub fn progress(&self) -> CrawlProgress {
        self.controller.progress()
    }

    pub fn status(&self) -> CrawlStatus {
        self.controller.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<CrawlProgress> {
        self.controller.subscribe()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{ScriptedDraws, TickDraws};
    use crate::storage::{MemoryStore, StorageError, StorageResult};
    use crate::url::HISTORY_KEY;
    use crate::UrlError;

    fn dashboard(store: MemoryStore) -> Dashboard<MemoryStore> {
        let controller = CrawlController::new(
            Duration::from_secs(2),
            ScriptedDraws::repeating(TickDraws::steady()),
        );
        Dashboard::new(store, controller, CrawlConfiguration::default())
    }

    /// A store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Sqlite(rusqlite::Error::InvalidQuery))
        }

        fn remove(&mut self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Sqlite(rusqlite::Error::InvalidQuery))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_valid_url() {
        let mut dash = dashboard(MemoryStore::new());

        assert_eq!(dash.submit("https://example.com"), Ok(Transition::Applied));
        assert_eq!(dash.status(), CrawlStatus::Running);
        assert_eq!(dash.progress().total_pages, 50);
        assert_eq!(dash.history().entries(), ["https://example.com"]);
        assert!(dash.store().get(HISTORY_KEY).unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_invalid_url_changes_nothing() {
        let mut dash = dashboard(MemoryStore::new());

        assert!(matches!(dash.submit("not a url"), Err(UrlError::Parse(_))));
        assert_eq!(dash.submit(""), Err(UrlError::Empty));
        assert_eq!(dash.status(), CrawlStatus::Idle);
        assert!(dash.history().is_empty());
        assert!(dash.store().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_running_keeps_history() {
        let mut dash = dashboard(MemoryStore::new());
        dash.submit("https://a.example").unwrap();

        assert_eq!(dash.submit("https://b.example"), Ok(Transition::Ignored));
        assert_eq!(dash.status(), CrawlStatus::Running);
        assert_eq!(dash.progress().current_url.as_deref(), Some("https://a.example/"));
        assert_eq!(dash.history().entries(), ["https://a.example"]);

        let restored = dashboard(std::mem::replace(&mut dash.store, MemoryStore::new()));
        assert_eq!(restored.history().entries(), ["https://a.example"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_does_not_duplicate_history() {
        let mut dash = dashboard(MemoryStore::new());
        dash.submit("https://example.com").unwrap();
        dash.stop();
        dash.submit("https://example.com").unwrap();

        assert_eq!(dash.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_survives_restart() {
        let mut dash = dashboard(MemoryStore::new());
        dash.submit("https://a.example").unwrap();
        dash.stop();
        dash.submit("https://b.example").unwrap();
        let store = std::mem::replace(&mut dash.store, MemoryStore::new());

        let restored = dashboard(store);
        assert_eq!(
            restored.history().entries(),
            ["https://b.example", "https://a.example"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_failure_is_not_raised() {
        let controller = CrawlController::new(
            Duration::from_secs(2),
            ScriptedDraws::repeating(TickDraws::steady()),
        );
        let mut dash = Dashboard::new(ReadOnlyStore, controller, CrawlConfiguration::default());

        assert_eq!(dash.submit("https://example.com"), Ok(Transition::Applied));
        assert_eq!(dash.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_config_edits_apply_to_next_start() {
        let mut dash = dashboard(MemoryStore::new());
        dash.update_config(ConfigPatch {
            max_pages: Some(5000),
            ..Default::default()
        });
        assert_eq!(dash.config().max_pages, 1000);

        assert_eq!(dash.set_numeric_text(NumericField::MaxPages, "abc"), 1);
        dash.submit("https://example.com").unwrap();
        assert_eq!(dash.progress().total_pages, 1);

        dash.reset_config();
        assert_eq!(dash.config(), &CrawlConfiguration::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_delegate_to_controller() {
        let mut dash = dashboard(MemoryStore::new());
        assert_eq!(dash.pause(), Transition::Ignored);

        dash.submit("https://example.com").unwrap();
        assert_eq!(dash.pause(), Transition::Applied);
        assert_eq!(dash.resume(), Transition::Applied);
        assert_eq!(dash.fail(), Transition::Applied);
        assert_eq!(dash.status(), CrawlStatus::Failed);
        assert_eq!(dash.stop(), Transition::Ignored);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_history_moves_to_front() {
        let mut dash = dashboard(MemoryStore::new());
        for url in ["https://a.example", "https://b.example"] {
            dash.submit(url).unwrap();
            dash.stop();
        }

        assert_eq!(dash.select_history(1).as_deref(), Some("https://a.example"));
        assert_eq!(dash.history().entries()[0], "https://a.example");
        assert_eq!(dash.select_history(9), None);

        dash.clear_history();
        assert!(dash.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_draft_check_is_debounced() {
        let mut dash = dashboard(MemoryStore::new());
        let mut rx = dash.subscribe_draft();

        dash.input_changed("htt");
        dash.input_changed("https://example.com");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(dash.draft_check(), None);

        rx.changed().await.unwrap();
        let check = dash.draft_check().unwrap();
        assert!(check.is_valid());
        assert_eq!(check.message(), "Valid URL");
    }
}
