//! Periodic plan-list refresh.

use crate::config::MIN_POLL_INTERVAL;
use crate::core::domain::backend::MigrationBackend;
use crate::core::domain::model::migration_plan::MigrationPlan;
use crate::dashboard::generation::Generation;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Cached plan list shared by the shell and its poller.
pub struct PlanFeed {
    backend: Arc<dyn MigrationBackend>,
    plans: RwLock<Vec<MigrationPlan>>,
    generation: Generation,
}

impl PlanFeed {
    pub fn new(backend: Arc<dyn MigrationBackend>) -> Self {
        Self {
            backend,
            plans: RwLock::new(Vec::new()),
            generation: Generation::default(),
        }
    }

    /// Re-fetches the plan list.
    ///
    /// A failed fetch leaves the list empty. When refreshes overlap, only the
    /// most recently started one may overwrite the cache.
    pub async fn refresh(&self) {
        let ticket = self.generation.issue();
        let result = self.backend.list_plans().await;

        let mut plans = self.plans.write().await;
        if !self.generation.is_current(ticket) {
            debug!("dropping stale plan list response");
            return;
        }
        match result {
            Ok(fetched) => *plans = fetched,
            Err(e) => {
                warn!(error = %e, "failed to fetch plans");
                plans.clear();
            }
        }
    }

    pub async fn plans(&self) -> Vec<MigrationPlan> {
        self.plans.read().await.clone()
    }
}

/// Owns the background task that refreshes a [`PlanFeed`].
///
/// The task fetches immediately, then once per interval. It is aborted when
/// the interval changes and when the poller is dropped.
pub struct PlanPoller {
    feed: Arc<PlanFeed>,
    interval: Duration,
    handle: JoinHandle<()>,
}

impl PlanPoller {
    /// Starts polling. Must be called from within a tokio runtime.
    pub fn start(feed: Arc<PlanFeed>, interval: Duration) -> Self {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let handle = spawn_loop(Arc::clone(&feed), interval);
        Self {
            feed,
            interval,
            handle,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Restarts the timer with a new interval, fetching immediately.
    pub fn set_interval(&mut self, interval: Duration) {
        self.handle.abort();
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self.handle = spawn_loop(Arc::clone(&self.feed), self.interval);
        debug!(interval_secs = self.interval.as_secs(), "plan poll interval changed");
    }
}

impl Drop for PlanPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn spawn_loop(feed: Arc<PlanFeed>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            feed.refresh().await;
        }
    })
}
