use controller::DispatchReport;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Interval between stats lines
pub const REPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Running totals for the tick loop
#[derive(Debug, Default)]
pub struct TickStats {
    pub ticks: AtomicU64,
    pub commands_sent: AtomicU64,
    pub commands_skipped: AtomicU64,
    pub failed_calls: AtomicU64,
    pub reloads: AtomicU64,
}

impl TickStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one tick and what its dispatch did
    pub fn record_tick(&self, report: &DispatchReport) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.commands_sent
            .fetch_add(report.sent as u64, Ordering::Relaxed);
        self.commands_skipped
            .fetch_add(report.skipped as u64, Ordering::Relaxed);
        self.failed_calls
            .fetch_add(report.failed as u64, Ordering::Relaxed);
    }

    pub fn record_reload(&self) {
        self.reloads.fetch_add(1, Ordering::Relaxed);
    }

    /// Print stats to the log
    pub fn print_stats(&self) {
        tracing::info!(
            "Ticks: {} | Sent: {} | Skipped: {} | Failed: {} | Reloads: {}",
            self.ticks.load(Ordering::Relaxed),
            self.commands_sent.load(Ordering::Relaxed),
            self.commands_skipped.load(Ordering::Relaxed),
            self.failed_calls.load(Ordering::Relaxed),
            self.reloads.load(Ordering::Relaxed),
        );
    }
}

/// Start stats reporting task
pub async fn start_stats_reporter(stats: Arc<TickStats>) {
    let mut interval = tokio::time::interval(REPORT_INTERVAL);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        stats.print_stats();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tick_accumulates() {
        let stats = TickStats::new();
        stats.record_tick(&DispatchReport {
            sent: 2,
            skipped: 1,
            failed: 0,
        });
        stats.record_tick(&DispatchReport {
            sent: 0,
            skipped: 3,
            failed: 1,
        });
        stats.record_reload();

        assert_eq!(stats.ticks.load(Ordering::Relaxed), 2);
        assert_eq!(stats.commands_sent.load(Ordering::Relaxed), 2);
        assert_eq!(stats.commands_skipped.load(Ordering::Relaxed), 4);
        assert_eq!(stats.failed_calls.load(Ordering::Relaxed), 1);
        assert_eq!(stats.reloads.load(Ordering::Relaxed), 1);
    }
}
