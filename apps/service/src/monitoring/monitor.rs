use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{Instant, sleep};
use tracing::info;

use crate::config::Config;
use crate::notify::Notifier;

use super::checker::Checker;
use super::prober::Prober;
use super::types::CycleStats;

/// The monitor loop: sweeps every configured endpoint once per cycle and
/// emits an aggregate health report on its own, longer interval.
///
/// Everything runs on one logical task; the loop is paced purely by its own
/// sleeps and holds all mutable state itself.
pub struct Monitor {
    prober: Prober,
    notifier: Arc<dyn Notifier>,
    endpoints: Vec<String>,
    cycle_interval: Duration,
    report_interval: Duration,
    stats: CycleStats,
    last_report: Instant,
    period_start: DateTime<Utc>,
}

impl Monitor {
    pub fn new(config: &Config, checker: Arc<dyn Checker>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            prober: Prober::new(checker, config.max_attempts, config.retry_delay),
            notifier,
            endpoints: config.endpoints.clone(),
            cycle_interval: config.cycle_interval,
            report_interval: config.report_interval,
            stats: CycleStats::default(),
            last_report: Instant::now(),
            period_start: Utc::now(),
        }
    }

    /// Run forever. There is no termination path; the process is expected
    /// to be killed externally.
    pub async fn run(mut self) {
        loop {
            self.run_cycle().await;
            info!("Sleeping for {}s before the next cycle", self.cycle_interval.as_secs());
            sleep(self.cycle_interval).await;
        }
    }

    /// One scheduler tick: report first when the report window has elapsed,
    /// then sweep all endpoints in configured order.
    async fn run_cycle(&mut self) {
        if self.last_report.elapsed() >= self.report_interval {
            self.send_report().await;
            self.last_report = Instant::now();
            self.period_start = Utc::now();
        }

        for endpoint in &self.endpoints {
            if !self.prober.probe(endpoint, &mut self.stats).await {
                self.notifier.alert(endpoint).await;
            }
        }
    }

    /// Hand the accumulated counters to the notifier as one report.
    ///
    /// The counters reset whether or not the send reaches its destination;
    /// the notifier is fire-and-forget, so a failed send drops that
    /// period's statistics.
    async fn send_report(&mut self) {
        info!(
            "Sending health report: {} checks, {} succeeded, {} failed",
            self.stats.total, self.stats.succeeded, self.stats.failed
        );

        let text = format!(
            "📊 Health report since {}: {} checks, {} succeeded, {} failed",
            self.period_start.format("%Y-%m-%d %H:%M:%S UTC"),
            self.stats.total,
            self.stats.succeeded,
            self.stats.failed
        );
        self.notifier.report(&text).await;

        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::monitoring::checker::CheckError;

    struct UpChecker;

    #[async_trait]
    impl Checker for UpChecker {
        async fn check(&self, _target: &str) -> Result<u64, CheckError> {
            Ok(1)
        }
    }

    struct DownChecker;

    #[async_trait]
    impl Checker for DownChecker {
        async fn check(&self, _target: &str) -> Result<u64, CheckError> {
            Err(CheckError::Status(503))
        }
    }

    /// Checker double that records every target it sees, in order.
    struct RecordingChecker {
        targets: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Checker for RecordingChecker {
        async fn check(&self, target: &str) -> Result<u64, CheckError> {
            self.targets.lock().unwrap().push(target.to_owned());
            Ok(1)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Mutex<Vec<String>>,
        reports: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn alert(&self, endpoint: &str) {
            self.alerts.lock().unwrap().push(endpoint.to_owned());
        }

        async fn report(&self, text: &str) {
            self.reports.lock().unwrap().push(text.to_owned());
        }
    }

    fn test_config(endpoints: &[&str]) -> Config {
        Config {
            endpoints: endpoints.iter().map(|endpoint| endpoint.to_string()).collect(),
            max_attempts: 1,
            cycle_interval: Duration::from_secs(30),
            retry_delay: Duration::from_secs(1),
            report_interval: Duration::from_secs(100),
            probe_timeout: Duration::from_secs(5),
            telegram: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn one_alert_per_failed_endpoint_per_cycle() {
        let notifier = Arc::new(RecordingNotifier::default());
        let config = test_config(&["a.example.com", "b.example.com"]);
        let mut monitor = Monitor::new(&config, Arc::new(DownChecker), notifier.clone());

        monitor.run_cycle().await;

        assert_eq!(*notifier.alerts.lock().unwrap(), vec!["a.example.com", "b.example.com"]);
    }

    #[tokio::test(start_paused = true)]
    async fn reachable_endpoints_raise_no_alert() {
        let notifier = Arc::new(RecordingNotifier::default());
        let config = test_config(&["a.example.com"]);
        let mut monitor = Monitor::new(&config, Arc::new(UpChecker), notifier.clone());

        monitor.run_cycle().await;

        assert!(notifier.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn endpoints_are_probed_in_configured_order() {
        let checker = Arc::new(RecordingChecker { targets: Mutex::new(Vec::new()) });
        let notifier = Arc::new(RecordingNotifier::default());
        let config = test_config(&["c.example.com", "a.example.com", "b.example.com"]);
        let mut monitor = Monitor::new(&config, checker.clone(), notifier);

        monitor.run_cycle().await;

        assert_eq!(
            *checker.targets.lock().unwrap(),
            vec!["http://c.example.com", "http://a.example.com", "http://b.example.com"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn report_fires_once_per_window_and_resets_counters() {
        let notifier = Arc::new(RecordingNotifier::default());
        let config = test_config(&["a.example.com"]);
        let mut monitor = Monitor::new(&config, Arc::new(UpChecker), notifier.clone());

        // Cycles at t = 0, 30, 60, 90: the 100s report window has not
        // elapsed yet.
        for _ in 0..4 {
            monitor.run_cycle().await;
            sleep(config.cycle_interval).await;
        }
        assert!(notifier.reports.lock().unwrap().is_empty());

        // t = 120: the window elapsed, the report covers the four checks
        // accumulated so far and the counters restart from zero before the
        // sweep that follows.
        monitor.run_cycle().await;

        let reports = notifier.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("4 checks, 4 succeeded, 0 failed"));
        assert_eq!(monitor.stats, CycleStats { total: 1, succeeded: 1, failed: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn second_report_covers_only_the_next_window() {
        let notifier = Arc::new(RecordingNotifier::default());
        let config = test_config(&["a.example.com"]);
        let mut monitor = Monitor::new(&config, Arc::new(DownChecker), notifier.clone());

        // Run enough cycles for two report windows to elapse.
        for _ in 0..9 {
            monitor.run_cycle().await;
            sleep(config.cycle_interval).await;
        }

        let reports = notifier.reports.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].contains("4 checks, 0 succeeded, 4 failed"));
        assert!(reports[1].contains("4 checks, 0 succeeded, 4 failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn counters_reset_even_when_the_notifier_goes_nowhere() {
        // NullNotifier drops everything on the floor, like a notifier whose
        // sends keep failing.
        let config = test_config(&["a.example.com"]);
        let mut monitor =
            Monitor::new(&config, Arc::new(DownChecker), Arc::new(crate::notify::NullNotifier));

        monitor.stats.record_failure();
        monitor.stats.record_failure();
        monitor.send_report().await;

        assert_eq!(monitor.stats, CycleStats::default());
    }
}
