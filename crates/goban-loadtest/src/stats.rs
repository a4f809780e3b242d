//! Shared results aggregation
//!
//! One [`HarnessStats`] instance is owned by the runner and handed by
//! reference to every concurrent actor; it is never a process-wide global.
//! Counters are lock-free atomics; the latency histogram and error tallies
//! take a write lock per mutation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use hdrhistogram::Histogram;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Aggregate counters and latency distribution for one harness run
#[derive(Debug)]
pub struct HarnessStats {
    /// Flows started
    pub flows_started: AtomicU64,

    /// Flows that completed every step
    pub flows_completed: AtomicU64,

    /// Flows aborted by any step
    pub flows_failed: AtomicU64,

    // === Account flow ===
    pub accounts_registered: AtomicU64,
    pub resets_completed: AtomicU64,

    // === Matchmaking flow ===
    pub matched_count: AtomicU64,
    pub surrendered_count: AtomicU64,
    pub reported_count: AtomicU64,
    pub match_canceled: AtomicU64,

    // === Private-room flow ===
    pub rooms_created: AtomicU64,
    pub games_finished: AtomicU64,
    pub black_wins: AtomicU64,
    pub total_moves: AtomicU64,

    /// Flow latency histogram (microseconds)
    latency_histogram: RwLock<Histogram<u64>>,

    /// Failure counts by error kind
    error_counts: RwLock<HashMap<String, u64>>,

    /// Run start time
    start_time: RwLock<Option<Instant>>,
}

impl HarnessStats {
    pub fn new() -> Self {
        Self {
            flows_started: AtomicU64::new(0),
            flows_completed: AtomicU64::new(0),
            flows_failed: AtomicU64::new(0),
            accounts_registered: AtomicU64::new(0),
            resets_completed: AtomicU64::new(0),
            matched_count: AtomicU64::new(0),
            surrendered_count: AtomicU64::new(0),
            reported_count: AtomicU64::new(0),
            match_canceled: AtomicU64::new(0),
            rooms_created: AtomicU64::new(0),
            games_finished: AtomicU64::new(0),
            black_wins: AtomicU64::new(0),
            total_moves: AtomicU64::new(0),
            latency_histogram: RwLock::new(
                Histogram::new_with_bounds(1, 600_000_000, 3).unwrap(), // 1µs to 600s
            ),
            error_counts: RwLock::new(HashMap::new()),
            start_time: RwLock::new(None),
        }
    }

    /// Stamp the run start; duration in the summary is measured from here
    pub fn mark_start(&self) {
        let mut start = self.start_time.write();
        if start.is_none() {
            *start = Some(Instant::now());
        }
    }

    /// Record a fully completed flow
    pub fn record_flow_success(&self, latency_us: u64) {
        self.flows_completed.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = self.latency_histogram.write().record(latency_us) {
            warn!("Failed to record latency: {}", e);
        }
    }

    /// Record an aborted flow under its error kind
    pub fn record_flow_failure(&self, error_kind: &str, latency_us: u64) {
        self.flows_failed.fetch_add(1, Ordering::Relaxed);

        let mut errors = self.error_counts.write();
        *errors.entry(error_kind.to_string()).or_insert(0) += 1;

        if let Err(e) = self.latency_histogram.write().record(latency_us) {
            warn!("Failed to record latency: {}", e);
        }
    }

    /// Get summary statistics
    pub fn summary(&self) -> StatsSummary {
        let hist = self.latency_histogram.read();
        let duration = self
            .start_time
            .read()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);

        let started = self.flows_started.load(Ordering::Relaxed);
        let completed = self.flows_completed.load(Ordering::Relaxed);
        let failed = self.flows_failed.load(Ordering::Relaxed);

        StatsSummary {
            duration_secs: duration,
            flows_started: started,
            flows_completed: completed,
            flows_failed: failed,
            success_rate: if started > 0 {
                (completed as f64 / started as f64) * 100.0
            } else {
                0.0
            },
            accounts_registered: self.accounts_registered.load(Ordering::Relaxed),
            resets_completed: self.resets_completed.load(Ordering::Relaxed),
            matched_count: self.matched_count.load(Ordering::Relaxed),
            surrendered_count: self.surrendered_count.load(Ordering::Relaxed),
            reported_count: self.reported_count.load(Ordering::Relaxed),
            match_canceled: self.match_canceled.load(Ordering::Relaxed),
            rooms_created: self.rooms_created.load(Ordering::Relaxed),
            games_finished: self.games_finished.load(Ordering::Relaxed),
            black_wins: self.black_wins.load(Ordering::Relaxed),
            total_moves: self.total_moves.load(Ordering::Relaxed),
            latency_p50_us: hist.value_at_quantile(0.50),
            latency_p90_us: hist.value_at_quantile(0.90),
            latency_p99_us: hist.value_at_quantile(0.99),
            latency_max_us: hist.max(),
            latency_mean_us: hist.mean() as u64,
            error_counts: self.error_counts.read().clone(),
        }
    }
}

impl Default for HarnessStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the aggregate results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSummary {
    pub duration_secs: f64,
    pub flows_started: u64,
    pub flows_completed: u64,
    pub flows_failed: u64,
    pub success_rate: f64,
    pub accounts_registered: u64,
    pub resets_completed: u64,
    pub matched_count: u64,
    pub surrendered_count: u64,
    pub reported_count: u64,
    pub match_canceled: u64,
    pub rooms_created: u64,
    pub games_finished: u64,
    pub black_wins: u64,
    pub total_moves: u64,
    pub latency_p50_us: u64,
    pub latency_p90_us: u64,
    pub latency_p99_us: u64,
    pub latency_max_us: u64,
    pub latency_mean_us: u64,
    pub error_counts: HashMap<String, u64>,
}

impl StatsSummary {
    /// Print formatted report
    pub fn print_report(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                 GOBAN LOAD TEST RESULTS                      ║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ Duration:          {:>10.2} seconds                        ║", self.duration_secs);
        println!("║ Flows Started:     {:>10}                                 ║", self.flows_started);
        println!("║ Completed:         {:>10}                                 ║", self.flows_completed);
        println!("║ Failed:            {:>10}                                 ║", self.flows_failed);
        println!("║ Success Rate:      {:>10.2}%                               ║", self.success_rate);
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ SCENARIO COUNTERS                                            ║");
        println!("║   Accounts registered:   {:>10}                           ║", self.accounts_registered);
        println!("║   Password resets:       {:>10}                           ║", self.resets_completed);
        println!("║   Matches formed:        {:>10}                           ║", self.matched_count);
        println!("║   Surrenders:            {:>10}                           ║", self.surrendered_count);
        println!("║   Results reported:      {:>10}                           ║", self.reported_count);
        println!("║   Matches canceled:      {:>10}                           ║", self.match_canceled);
        println!("║   Rooms created:         {:>10}                           ║", self.rooms_created);
        println!("║   Games finished:        {:>10}                           ║", self.games_finished);
        println!("║   Black wins:            {:>10}                           ║", self.black_wins);
        println!("║   Total moves:           {:>10}                           ║", self.total_moves);
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ FLOW LATENCY (microseconds)                                  ║");
        println!("║   p50:             {:>10}                                 ║", self.latency_p50_us);
        println!("║   p90:             {:>10}                                 ║", self.latency_p90_us);
        println!("║   p99:             {:>10}                                 ║", self.latency_p99_us);
        println!("║   max:             {:>10}                                 ║", self.latency_max_us);
        println!("║   mean:            {:>10}                                 ║", self.latency_mean_us);

        if !self.error_counts.is_empty() {
            println!("╠══════════════════════════════════════════════════════════════╣");
            println!("║ ERRORS                                                       ║");
            for (error_kind, count) in &self.error_counts {
                println!("║   {:20}: {:>10}                         ║", error_kind, count);
            }
        }

        println!("╚══════════════════════════════════════════════════════════════╝\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_success_rate() {
        let stats = HarnessStats::new();
        stats.mark_start();

        for _ in 0..4 {
            stats.flows_started.fetch_add(1, Ordering::Relaxed);
        }
        stats.record_flow_success(1_000);
        stats.record_flow_success(2_000);
        stats.record_flow_success(3_000);
        stats.record_flow_failure("transport", 10_000);

        let summary = stats.summary();
        assert_eq!(summary.flows_started, 4);
        assert_eq!(summary.flows_completed, 3);
        assert_eq!(summary.flows_failed, 1);
        assert!((summary.success_rate - 75.0).abs() < f64::EPSILON);
        assert_eq!(summary.error_counts["transport"], 1);
    }

    #[test]
    fn test_empty_summary() {
        let summary = HarnessStats::new().summary();
        assert_eq!(summary.flows_started, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert!(summary.error_counts.is_empty());
    }

    #[test]
    fn test_error_kinds_accumulate() {
        let stats = HarnessStats::new();
        stats.record_flow_failure("rejected", 100);
        stats.record_flow_failure("rejected", 120);
        stats.record_flow_failure("poll_timeout", 9_000_000);

        let summary = stats.summary();
        assert_eq!(summary.error_counts["rejected"], 2);
        assert_eq!(summary.error_counts["poll_timeout"], 1);
        assert_eq!(summary.flows_failed, 3);
    }

    #[test]
    fn test_scenario_counters_flow_into_summary() {
        let stats = HarnessStats::new();
        stats.matched_count.fetch_add(1, Ordering::Relaxed);
        stats.surrendered_count.fetch_add(1, Ordering::Relaxed);
        stats.reported_count.fetch_add(1, Ordering::Relaxed);

        let summary = stats.summary();
        assert_eq!(summary.matched_count, 1);
        assert_eq!(summary.surrendered_count, 1);
        assert_eq!(summary.reported_count, 1);
        assert_eq!(summary.match_canceled, 0);
    }
}
