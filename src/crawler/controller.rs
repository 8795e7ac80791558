//! Timer-driven crawl controller
//!
//! The controller owns the crawl machine behind a single mutex and runs one
//! tokio task that ticks it on a fixed period while the crawl is running.
//! Commands bump a generation counter under the same lock the ticks take, so
//! once `pause` or `stop` returns no stale tick can change the progress.

use crate::config::{CrawlConfiguration, SimulatorConfig, MIN_TICK_INTERVAL_MS};
use crate::crawler::machine::{CrawlMachine, Transition};
use crate::crawler::simulator::{DrawSource, SeededDraws};
use crate::state::{CrawlProgress, CrawlStatus};
use crate::UrlResult;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

struct Shared {
    machine: CrawlMachine,
    draws: Box<dyn DrawSource>,
    /// Incremented by every applied command; a driver exits once it no
    /// longer matches the generation it was spawned with
    generation: u64,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs simulated crawls and publishes their progress
pub struct CrawlController {
    shared: Arc<Mutex<Shared>>,
    updates: Arc<watch::Sender<CrawlProgress>>,
    tick_period: Duration,
    driver: Option<JoinHandle<()>>,
}

impl CrawlController {
    /// Creates a controller ticking every `tick_period` with the given draws
    ///
    /// Periods shorter than [`MIN_TICK_INTERVAL_MS`] are raised to it.
    pub fn new<D>(tick_period: Duration, draws: D) -> Self
    where
        D: DrawSource + 'static,
    {
        let min_period = Duration::from_millis(MIN_TICK_INTERVAL_MS);
        if tick_period < min_period {
            tracing::warn!(
                "Tick period {:?} is below the {:?} minimum, using the minimum",
                tick_period,
                min_period
            );
        }
        let tick_period = tick_period.max(min_period);

        let (tx, _rx) = watch::channel(CrawlProgress::default());
        Self {
            shared: Arc::new(Mutex::new(Shared {
                machine: CrawlMachine::new(),
                draws: Box::new(draws),
                generation: 0,
            })),
            updates: Arc::new(tx),
            tick_period,
            driver: None,
        }
    }

    /// Creates a controller from simulator settings, seeded when a seed is set
    pub fn from_config(config: &SimulatorConfig) -> Self {
        let period = Duration::from_millis(config.tick_interval_ms);
        match config.seed {
            Some(seed) => Self::new(period, SeededDraws::new(seed)),
            None => Self::new(period, SeededDraws::from_entropy()),
        }
    }

    /// A copy of the current progress
    pub fn progress(&self) -> CrawlProgress {
        lock(&self.shared).machine.progress().clone()
    }

    pub fn status(&self) -> CrawlStatus {
        lock(&self.shared).machine.status()
    }

    /// Receives a snapshot after every command and tick that changes progress
    pub fn subscribe(&self) -> watch::Receiver<CrawlProgress> {
        self.updates.subscribe()
    }

    /// Starts a crawl of `url`; see [`CrawlMachine::start`]
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, url: &str, config: &CrawlConfiguration) -> UrlResult<Transition> {
        let generation = {
            let mut shared = lock(&self.shared);
            let transition = shared.machine.start(url, config, Utc::now())?;
            if !transition.is_applied() {
                return Ok(transition);
            }
            self.commit(&mut shared)
        };
        self.spawn_driver(generation);
        Ok(Transition::Applied)
    }

    pub fn pause(&mut self) -> Transition {
        self.halt_with(CrawlMachine::pause)
    }

    /// Resumes a paused crawl with a fresh timer
    pub fn resume(&mut self) -> Transition {
        let generation = {
            let mut shared = lock(&self.shared);
            if !shared.machine.resume().is_applied() {
                return Transition::Ignored;
            }
            self.commit(&mut shared)
        };
        self.spawn_driver(generation);
        Transition::Applied
    }

    pub fn stop(&mut self) -> Transition {
        self.halt_with(CrawlMachine::stop)
    }

    pub fn fail(&mut self) -> Transition {
        self.halt_with(CrawlMachine::fail)
    }

    /// Applies a command that ends ticking and cancels the driver
    fn halt_with(&mut self, command: fn(&mut CrawlMachine) -> Transition) -> Transition {
        {
            let mut shared = lock(&self.shared);
            if !command(&mut shared.machine).is_applied() {
                return Transition::Ignored;
            }
            self.commit(&mut shared);
        }
        self.cancel_driver();
        Transition::Applied
    }

    /// Invalidates running drivers and publishes the new state
    fn commit(&self, shared: &mut Shared) -> u64 {
        shared.generation += 1;
        self.updates.send_replace(shared.machine.progress().clone());
        shared.generation
    }

    fn cancel_driver(&mut self) {
        if let Some(handle) = self.driver.take() {
            handle.abort();
        }
    }

    fn spawn_driver(&mut self, generation: u64) {
        self.cancel_driver();
        self.driver = Some(tokio::spawn(drive(
            Arc::clone(&self.shared),
            Arc::clone(&self.updates),
            self.tick_period,
            generation,
        )));
    }
}

impl Drop for CrawlController {
    fn drop(&mut self) {
        self.cancel_driver();
    }
}

/// Ticks the machine every `period` until it stops running or a command
/// supersedes this driver
async fn drive(
    shared: Arc<Mutex<Shared>>,
    updates: Arc<watch::Sender<CrawlProgress>>,
    period: Duration,
    generation: u64,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let mut guard = lock(&shared);
        if guard.generation != generation {
            break;
        }
        let state = &mut *guard;
        let draws = state.draws.next_draws();
        if !state.machine.tick(draws, Utc::now()).is_applied() {
            break;
        }

        let snapshot = state.machine.progress().clone();
        let running = snapshot.status == CrawlStatus::Running;
        updates.send_replace(snapshot);
        if !running {
            break;
        }
    }
}
