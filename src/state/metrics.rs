use chrono::Utc;
use serde::Serialize;
use std::collections::VecDeque;

/// Sliding window for the snapshot rate (milliseconds)
const RATE_WINDOW_MS: i64 = 5000;

/// Tracks viewer-side counters for the status bar
#[derive(Clone, Debug, Default)]
pub struct ViewerMetrics {
    snapshots_applied: u64,
    messages_ignored: u64,
    decode_failures: u64,
    records_skipped: u64,
    customers_created: u64,
    customers_retired: u64,
    frames: u64,

    /// Snapshot arrival times for rate calculation (sliding 5-second window)
    snapshot_timestamps: VecDeque<i64>,
}

impl ViewerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied snapshot
    pub fn record_snapshot(&mut self, created: usize, retired: usize, skipped: usize) {
        self.record_snapshot_at(created, retired, skipped, Utc::now().timestamp_millis());
    }

    pub(crate) fn record_snapshot_at(
        &mut self,
        created: usize,
        retired: usize,
        skipped: usize,
        now_ms: i64,
    ) {
        self.snapshots_applied += 1;
        self.customers_created += created as u64;
        self.customers_retired += retired as u64;
        self.records_skipped += skipped as u64;

        self.snapshot_timestamps.push_back(now_ms);

        // Prune old timestamps (keep last 5 seconds)
        while let Some(&oldest) = self.snapshot_timestamps.front() {
            if now_ms - oldest > RATE_WINDOW_MS {
                self.snapshot_timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn record_ignored(&mut self) {
        self.messages_ignored += 1;
    }

    pub fn record_decode_failure(&mut self) {
        self.decode_failures += 1;
    }

    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    /// Snapshots per second over the last 5 seconds
    pub fn snapshot_rate(&self) -> f64 {
        self.snapshot_rate_at(Utc::now().timestamp_millis())
    }

    /// Rate as of `now_ms`, counting only arrivals inside the window
    pub(crate) fn snapshot_rate_at(&self, now_ms: i64) -> f64 {
        let recent = self
            .snapshot_timestamps
            .iter()
            .filter(|&&ts| now_ms - ts <= RATE_WINDOW_MS)
            .count();
        recent as f64 / (RATE_WINDOW_MS as f64 / 1000.0)
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        self.get_snapshot_at(Utc::now().timestamp_millis())
    }

    pub(crate) fn get_snapshot_at(&self, now_ms: i64) -> MetricsSnapshot {
        MetricsSnapshot {
            snapshots_applied: self.snapshots_applied,
            snapshot_rate: self.snapshot_rate_at(now_ms),
            messages_ignored: self.messages_ignored,
            decode_failures: self.decode_failures,
            records_skipped: self.records_skipped,
            customers_created: self.customers_created,
            customers_retired: self.customers_retired,
            frames: self.frames,
        }
    }
}

/// Metrics at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub snapshots_applied: u64,
    pub snapshot_rate: f64,
    pub messages_ignored: u64,
    pub decode_failures: u64,
    pub records_skipped: u64,
    pub customers_created: u64,
    pub customers_retired: u64,
    pub frames: u64,
}
