use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Client-side request counters, recorded by the HTTP wrapper on every call.
#[derive(Default)]
pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,
    transport_failures: AtomicUsize,

    // Timing (in microseconds)
    total_latency_us: AtomicU64,
    max_latency_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, duration: Duration, outcome: Outcome) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        match outcome {
            Outcome::Success => {
                self.successful_requests.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::Failure => {
                self.failed_requests.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::TransportFailure => {
                self.failed_requests.fetch_add(1, Ordering::Relaxed);
                self.transport_failures.fetch_add(1, Ordering::Relaxed);
            }
        }

        let micros = duration.as_micros() as u64;
        self.total_latency_us.fetch_add(micros, Ordering::Relaxed);
        self.max_latency_us.fetch_max(micros, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total_requests.load(Ordering::Relaxed);
        let latency = self.total_latency_us.load(Ordering::Relaxed) as f64;

        MetricsSnapshot {
            total_requests: total,
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            avg_latency_ms: if total > 0 {
                latency / total as f64 / 1000.0 // Convert to ms
            } else {
                0.0
            },
            max_latency_ms: self.max_latency_us.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    TransportFailure,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub transport_failures: usize,
    pub avg_latency_ms: f64,
    pub max_latency_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_averages() {
        let metrics = Metrics::new();
        metrics.record(Duration::from_millis(10), Outcome::Success);
        metrics.record(Duration::from_millis(30), Outcome::TransportFailure);

        let snap = metrics.snapshot();
        assert_eq!(snap.total_requests, 2);
        assert_eq!(snap.successful_requests, 1);
        assert_eq!(snap.failed_requests, 1);
        assert_eq!(snap.transport_failures, 1);
        assert!((snap.avg_latency_ms - 20.0).abs() < 0.01);
        assert!((snap.max_latency_ms - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_snapshot() {
        let snap = Metrics::new().snapshot();
        assert_eq!(snap.total_requests, 0);
        assert_eq!(snap.avg_latency_ms, 0.0);
    }
}
