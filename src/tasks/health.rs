//! Reaper Health
//!
//! Lock-free liveness counters written by the reaper and read by anyone
//! holding the cache. A reaper that died or stopped sweeping shows up here
//! instead of silently letting the cache grow.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

const NEVER: u64 = u64::MAX;

// == Reaper Health ==
/// Shared health state of one reaper.
#[derive(Debug)]
pub struct ReaperHealth {
    /// Reference point for the millisecond timestamps below
    origin: Instant,
    /// Scan interval the reaper was started with
    interval: Duration,
    running: AtomicBool,
    sweeps: AtomicU64,
    restarts: AtomicU64,
    removed: AtomicU64,
    /// Milliseconds after `origin` of the last completed sweep, or `NEVER`
    last_sweep_ms: AtomicU64,
}

impl ReaperHealth {
    pub fn new(interval: Duration) -> Self {
        Self {
            origin: Instant::now(),
            interval,
            running: AtomicBool::new(false),
            sweeps: AtomicU64::new(0),
            restarts: AtomicU64::new(0),
            removed: AtomicU64::new(0),
            last_sweep_ms: AtomicU64::new(NEVER),
        }
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    // == Record Sweep ==
    /// Records a completed sweep that removed `removed` entries.
    pub(crate) fn record_sweep(&self, removed: usize) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.removed.fetch_add(removed as u64, Ordering::Relaxed);
        self.last_sweep_ms
            .store(self.origin.elapsed().as_millis() as u64, Ordering::Release);
    }

    pub(crate) fn record_restart(&self) {
        self.restarts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn restarts(&self) -> u64 {
        self.restarts.load(Ordering::Relaxed)
    }

    // == Snapshot ==
    /// Captures a point-in-time view of the reaper's health.
    ///
    /// A running reaper is reported stale when neither a sweep nor its start
    /// happened within the last two scan intervals.
    pub fn snapshot(&self) -> ReaperHealthSnapshot {
        let now_ms = self.origin.elapsed().as_millis() as u64;
        let last = self.last_sweep_ms.load(Ordering::Acquire);
        let since_last_sweep_ms = (last != NEVER).then(|| now_ms.saturating_sub(last));

        let quiet_for = Duration::from_millis(since_last_sweep_ms.unwrap_or(now_ms));
        let alive = self.is_running();

        ReaperHealthSnapshot {
            alive,
            stale: alive && quiet_for > self.interval.saturating_mul(2),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            restarts: self.restarts(),
            removed: self.removed.load(Ordering::Relaxed),
            since_last_sweep_ms,
        }
    }
}

// == Health Snapshot ==
/// Point-in-time copy of [`ReaperHealth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaperHealthSnapshot {
    /// The reaper task is still running
    pub alive: bool,
    /// Running, but has not swept for more than two scan intervals
    pub stale: bool,
    /// Completed sweeps
    pub sweeps: u64,
    /// Times the sweep loop was restarted after a panic
    pub restarts: u64,
    /// Entries removed across all sweeps
    pub removed: u64,
    /// Milliseconds since the last sweep, None before the first one
    pub since_last_sweep_ms: Option<u64>,
}

impl ReaperHealthSnapshot {
    pub fn is_healthy(&self) -> bool {
        self.alive && !self.stale
    }
}
