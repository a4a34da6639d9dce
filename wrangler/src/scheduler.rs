//! Periodic trigger for wrangling runs
//!
//! Runs never overlap inside one process: every run holds the shared run
//! lock, and ticks that fire while a run is still going are skipped.

use crate::error::WranglerResult;
use crate::models::RunReport;
use crate::services::WranglingOrchestrator;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

/// Lock serialising wrangling work within the process
pub type RunLock = Arc<Mutex<()>>;

/// Scheduled driver around the orchestrator
#[derive(Clone)]
pub struct Scheduler {
    orchestrator: Arc<WranglingOrchestrator>,
    run_lock: RunLock,
    interval: Duration,
}

impl Scheduler {
    pub fn new(
        orchestrator: Arc<WranglingOrchestrator>,
        run_lock: RunLock,
        interval: Duration,
    ) -> Self {
        Self {
            orchestrator,
            run_lock,
            interval,
        }
    }

    /// One run under the run lock
    ///
    /// Waits for any in-flight single-barcode wrangle to finish first.
    pub async fn run_once(&self) -> WranglerResult<RunReport> {
        let _guard = self.run_lock.lock().await;
        self.orchestrator.run().await
    }

    /// Tick until `shutdown` resolves
    ///
    /// An aborted run is logged and the next tick tries again; nothing is
    /// retried in between.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(interval_secs = self.interval.as_secs(), "Scheduler started");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        tracing::error!("Wrangling run aborted: {}", e);
                    }
                }
            }
        }
    }
}
