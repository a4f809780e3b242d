//! Scenario runner
//!
//! Spawns one task per virtual user; each runs its flows sequentially and
//! blocks on network I/O and pacing sleeps. Flows across users run
//! concurrently up to the configured cap. One actor's failure never aborts
//! the harness; it is tallied and the rest keep going.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use goban_core::error::Result;

use crate::config::LoadTestConfig;
use crate::pool::SessionPool;
use crate::scenario::{Scenario, ScenarioContext};
use crate::stats::{HarnessStats, StatsSummary};

/// Main harness runner; owns the shared aggregates
pub struct HarnessRunner {
    config: LoadTestConfig,
    stats: Arc<HarnessStats>,
    pool: Arc<SessionPool>,
}

impl HarnessRunner {
    pub fn new(config: LoadTestConfig) -> Self {
        Self {
            config,
            stats: Arc::new(HarnessStats::new()),
            pool: Arc::new(SessionPool::new()),
        }
    }

    pub fn stats(&self) -> &Arc<HarnessStats> {
        &self.stats
    }

    pub fn pool(&self) -> &Arc<SessionPool> {
        &self.pool
    }

    /// Run one scenario across all virtual users
    ///
    /// Reusing the runner for several scenarios accumulates into the same
    /// aggregates.
    pub async fn run(&self, scenario: Arc<dyn Scenario>) -> Result<StatsSummary> {
        info!(
            scenario = scenario.name(),
            target = %self.config.target_url,
            users = self.config.virtual_users,
            iterations = self.config.iterations,
            "starting load test"
        );
        self.stats.mark_start();

        let ctx = Arc::new(ScenarioContext::new(
            &self.config,
            self.stats.clone(),
            self.pool.clone(),
        )?);
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));

        let mut handles = Vec::with_capacity(self.config.virtual_users);
        for actor in 0..self.config.virtual_users {
            let ctx = ctx.clone();
            let scenario = scenario.clone();
            let semaphore = semaphore.clone();
            let iterations = self.config.iterations;

            handles.push(tokio::spawn(async move {
                for iteration in 0..iterations {
                    let Ok(_permit) = semaphore.acquire().await else {
                        break;
                    };

                    ctx.stats.flows_started.fetch_add(1, Ordering::Relaxed);
                    let start = Instant::now();

                    match scenario.run(&ctx).await {
                        Ok(()) => {
                            ctx.stats
                                .record_flow_success(start.elapsed().as_micros() as u64);
                        }
                        Err(err) => {
                            warn!(actor, iteration, error = %err, "flow failed");
                            ctx.stats.record_flow_failure(
                                err.kind(),
                                start.elapsed().as_micros() as u64,
                            );
                        }
                    }
                }
            }));
        }

        join_all(handles).await;

        info!(scenario = scenario.name(), "load test complete");
        Ok(self.stats.summary())
    }
}
