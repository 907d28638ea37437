use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};
use url::Url;

use super::checker::{CheckError, Checker};
use super::types::CycleStats;

/// Bounded-retry reachability probe for a single endpoint.
pub struct Prober {
    checker: Arc<dyn Checker>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Prober {
    pub fn new(checker: Arc<dyn Checker>, max_attempts: u32, retry_delay: Duration) -> Self {
        Self { checker, max_attempts, retry_delay }
    }

    /// Check one endpoint, retrying up to the attempt budget.
    ///
    /// Returns true as soon as one attempt finds the endpoint reachable.
    /// Attempts run strictly one after another; the retry delay is skipped
    /// after the final attempt. Every attempt is recorded in `stats`.
    pub async fn probe(&self, endpoint: &str, stats: &mut CycleStats) -> bool {
        let target = normalize_target(endpoint);

        for attempt in 1..=self.max_attempts {
            match self.checker.check(&target).await {
                Ok(latency_ms) => {
                    stats.record_success();
                    info!("Endpoint {} is UP ({} ms)", endpoint, latency_ms);
                    return true;
                }
                Err(CheckError::Status(code)) => {
                    stats.record_failure();
                    warn!("Endpoint {} is DOWN with status code {}", endpoint, code);
                }
                Err(error) => {
                    stats.record_failure();
                    error!("Endpoint {} is DOWN: {}", endpoint, error);
                }
            }

            if attempt < self.max_attempts {
                info!(
                    "Retrying endpoint {} in {}s (attempt {}/{})",
                    endpoint,
                    self.retry_delay.as_secs(),
                    attempt,
                    self.max_attempts
                );
                sleep(self.retry_delay).await;
            }
        }

        error!("Endpoint {} is DOWN after {} attempts", endpoint, self.max_attempts);
        false
    }
}

/// Default to plain HTTP when the configured endpoint carries no scheme.
///
/// A target that still fails to parse as a URL is probed as-is; the attempt
/// then fails through the checker and is counted like any other failure.
pub fn normalize_target(endpoint: &str) -> String {
    let target = if endpoint.contains("://") {
        endpoint.to_owned()
    } else {
        format!("http://{endpoint}")
    };

    if let Err(error) = Url::parse(&target) {
        warn!("Endpoint {} does not parse as a URL: {}", endpoint, error);
    }

    target
}
