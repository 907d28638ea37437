//! Monitoring engine: single-attempt reachability checks, bounded-retry
//! probing, and the monitor loop that drives both on its two cadences.

pub mod checker;
pub mod monitor;
pub mod prober;
pub mod types;

pub use checker::HttpChecker;
pub use monitor::Monitor;
pub use prober::Prober;
pub use types::CycleStats;
