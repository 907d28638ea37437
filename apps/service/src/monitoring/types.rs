/// Counters accumulated across checks since the last health report.
///
/// Owned by the monitor loop and handed to the prober by mutable reference;
/// there is no shared or global state behind them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Attempts performed, successful or not.
    pub total: u64,
    /// Attempts that found the endpoint reachable.
    pub succeeded: u64,
    /// Attempts that did not.
    pub failed: u64,
}

impl CycleStats {
    pub fn record_success(&mut self) {
        self.total += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }

    /// Zero all counters. Called right after a report is handed to the
    /// notifier, whether or not the send worked out.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_and_reset() {
        let mut stats = CycleStats::default();
        stats.record_success();
        stats.record_failure();
        stats.record_failure();

        assert_eq!(stats, CycleStats { total: 3, succeeded: 1, failed: 2 });

        stats.reset();
        assert_eq!(stats, CycleStats::default());
    }
}
