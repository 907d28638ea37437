//! Outbound operator notifications.

pub mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use tracing::warn;

/// Capability interface the monitor loop depends on for notifications.
///
/// Both operations are best-effort: implementations log failures internally
/// and never surface them to the caller, and the loop never bases a
/// scheduling decision on them.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce that an endpoint stayed unreachable through its whole retry
    /// budget.
    async fn alert(&self, endpoint: &str);

    /// Deliver an aggregate health report.
    async fn report(&self, text: &str);
}

/// Stand-in used when no notification credentials are configured.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn alert(&self, endpoint: &str) {
        warn!("No notifier configured, dropping alert for endpoint {}", endpoint);
    }

    async fn report(&self, text: &str) {
        warn!("No notifier configured, dropping report: {}", text);
    }
}
