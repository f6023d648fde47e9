use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters shared between the frame producer and the worker.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    frames_submitted: AtomicU64,
    frames_replaced: AtomicU64,
    frames_dropped: AtomicU64,
    frames_skipped: AtomicU64,
    frames_classified: AtomicU64,
    last_classification_us: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub frames_submitted: u64,
    pub frames_replaced: u64,
    pub frames_dropped: u64,
    pub frames_skipped: u64,
    pub frames_classified: u64,
    pub last_classification: Duration,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submitted(&self) {
        self.frames_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// A waiting frame was overwritten before the worker picked it up.
    pub fn record_replaced(&self) {
        self.frames_replaced.fetch_add(1, Ordering::Relaxed);
    }

    /// A waiting frame was discarded because intake closed.
    pub fn record_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.frames_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_classified(&self, duration: Duration) {
        self.frames_classified.fetch_add(1, Ordering::Relaxed);
        self.last_classification_us
            .store(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_submitted: self.frames_submitted.load(Ordering::Relaxed),
            frames_replaced: self.frames_replaced.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            frames_skipped: self.frames_skipped.load(Ordering::Relaxed),
            frames_classified: self.frames_classified.load(Ordering::Relaxed),
            last_classification: Duration::from_micros(
                self.last_classification_us.load(Ordering::Relaxed),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_events() {
        let metrics = PipelineMetrics::new();
        metrics.record_submitted();
        metrics.record_submitted();
        metrics.record_replaced();
        metrics.record_dropped();
        metrics.record_skipped();
        metrics.record_classified(Duration::from_micros(42));

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                frames_submitted: 2,
                frames_replaced: 1,
                frames_dropped: 1,
                frames_skipped: 1,
                frames_classified: 1,
                last_classification: Duration::from_micros(42),
            }
        );
    }
}
