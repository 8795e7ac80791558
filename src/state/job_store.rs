//! Explicit application state for the backend's crawl job list
//!
//! Updates are expressed as actions applied by a pure reducer, so the job list
//! can be passed to whoever needs it instead of living in a global.

use crate::api::{CrawlJob, JobPatch, JobStatus};
use crate::storage::KeyValueStore;
use crate::CrawlError;
use serde::{Deserialize, Serialize};

/// Storage key for the persisted job list
pub const JOB_STORE_KEY: &str = "crawl-store";

/// Job list plus request bookkeeping
///
/// Only `jobs` and `current_job` survive a save; loading and error state are
/// per-session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStore {
    pub jobs: Vec<CrawlJob>,
    pub current_job: Option<CrawlJob>,
    #[serde(skip)]
    pub is_loading: bool,
    #[serde(skip)]
    pub error: Option<String>,
}

/// A change to the job store
#[derive(Debug, Clone, PartialEq)]
pub enum JobAction {
    SetJobs(Vec<CrawlJob>),
    AddJob(CrawlJob),
    UpdateJob { id: String, patch: JobPatch },
    SetCurrentJob(Option<CrawlJob>),
    SetLoading(bool),
    SetError(Option<String>),
    ClearError,
}

/// Counts shown on the dashboard overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobSummary {
    pub total: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Applies one action to the store, returning the new state
pub fn reduce(mut state: JobStore, action: JobAction) -> JobStore {
    match action {
        JobAction::SetJobs(jobs) => state.jobs = jobs,
        JobAction::AddJob(job) => state.jobs.push(job),
        JobAction::UpdateJob { id, patch } => {
            if let Some(job) = state.jobs.iter_mut().find(|job| job.id == id) {
                job.apply(patch);
            }
        }
        JobAction::SetCurrentJob(job) => state.current_job = job,
        JobAction::SetLoading(loading) => state.is_loading = loading,
        JobAction::SetError(error) => state.error = error,
        JobAction::ClearError => state.error = None,
    }
    state
}

impl JobStore {
    /// Applies an action in place
    pub fn dispatch(&mut self, action: JobAction) {
        *self = reduce(std::mem::take(self), action);
    }

    pub fn summary(&self) -> JobSummary {
        let count = |status: JobStatus| self.jobs.iter().filter(|j| j.status == status).count();
        JobSummary {
            total: self.jobs.len(),
            running: count(JobStatus::Running),
            completed: count(JobStatus::Completed),
            failed: count(JobStatus::Failed),
        }
    }

    /// The first `n` jobs, in list order
    pub fn recent(&self, n: usize) -> &[CrawlJob] {
        &self.jobs[..self.jobs.len().min(n)]
    }

    /// Restores the persisted subset, or an empty store if nothing was saved
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, CrawlError> {
        match store.get(JOB_STORE_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), CrawlError> {
        let json = serde_json::to_string(self)?;
        store.set(JOB_STORE_KEY, &json)?;
        Ok(())
    }
}
