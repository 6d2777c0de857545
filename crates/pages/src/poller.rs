use api::{ApiClient, StatisticsSnapshot};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::page::PageError;

pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(30);

pub fn clamp_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollerError {
    #[error("poll period must be greater than zero")]
    ZeroPeriod,
}

#[derive(Debug, Clone)]
pub struct PollEvent {
    /// 1 for the fetch made at startup, then one per interval.
    pub tick: u64,
    pub result: Result<StatisticsSnapshot, PageError>,
}

/// Background statistics refresher.
///
/// The fetch is awaited inside the loop, so there is never more than one
/// request outstanding; a slow backend delays later ticks instead of stacking
/// them up.
pub struct StatsPoller {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
    period: Duration,
}

impl StatsPoller {
    /// Poll `/api/stats`. The interval is clamped to 10..=30 seconds.
    pub fn spawn(
        client: Arc<ApiClient>,
        interval: Duration,
        sink: mpsc::Sender<PollEvent>,
    ) -> Self {
        Self::start(clamp_interval(interval), sink, move || {
            let client = client.clone();
            async move { client.stats().snapshot().await }
        })
    }

    /// Poll with an arbitrary fetch function and an unclamped period.
    pub fn spawn_with<F, Fut>(
        period: Duration,
        sink: mpsc::Sender<PollEvent>,
        fetch: F,
    ) -> Result<Self, PollerError>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = api::Result<StatisticsSnapshot>> + Send + 'static,
    {
        if period.is_zero() {
            return Err(PollerError::ZeroPeriod);
        }
        Ok(Self::start(period, sink, fetch))
    }

    /// `period` must be non-zero.
    fn start<F, Fut>(period: Duration, sink: mpsc::Sender<PollEvent>, mut fetch: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = api::Result<StatisticsSnapshot>> + Send + 'static,
    {
        let (shutdown, mut stop) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut tick = 0u64;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = stop.changed() => break,
                }

                tick += 1;
                // The wrapper already logged any failure.
                let result = fetch().await.map_err(PageError::from);
                if sink.send(PollEvent { tick, result }).await.is_err() {
                    tracing::debug!("statistics sink closed, stopping poller");
                    break;
                }
            }
        });

        tracing::debug!(period_secs = period.as_secs(), "statistics poller started");
        Self {
            handle,
            shutdown,
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Stop polling and wait for the task to finish. A fetch already in flight
    /// completes first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "statistics poller task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn snapshot(total_nodes: u64) -> StatisticsSnapshot {
        StatisticsSnapshot {
            total_nodes,
            ..StatisticsSnapshot::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_are_spaced_by_interval() {
        let (tx, mut rx) = mpsc::channel(16);
        let starts = Arc::new(Mutex::new(Vec::new()));
        let recorded = starts.clone();

        let poller = StatsPoller::spawn_with(Duration::from_secs(10), tx, move || {
            recorded.lock().unwrap().push(Instant::now());
            async { Ok(snapshot(1)) }
        })
        .unwrap();

        for expected_tick in 1..=4 {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.tick, expected_tick);
            assert!(event.result.is_ok());
        }
        poller.shutdown().await;

        let starts = starts.lock().unwrap();
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(10));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_never_overlaps() {
        let (tx, mut rx) = mpsc::channel(16);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let (counter, max) = (in_flight.clone(), max_seen.clone());

        // Each fetch takes longer than the interval.
        let poller = StatsPoller::spawn_with(Duration::from_secs(10), tx, move || {
            let counter = counter.clone();
            let max = max.clone();
            async move {
                let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
                max.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(25)).await;
                counter.fetch_sub(1, Ordering::SeqCst);
                Ok(snapshot(2))
            }
        })
        .unwrap();

        for _ in 0..3 {
            rx.recv().await.unwrap();
        }
        poller.shutdown().await;
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_delivered_and_polling_continues() {
        let (tx, mut rx) = mpsc::channel(16);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let poller = StatsPoller::spawn_with(Duration::from_secs(10), tx, move || {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(api::ApiError::Request("offline".into()))
                } else {
                    Ok(snapshot(3))
                }
            }
        })
        .unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.result.unwrap_err().message, "offline");
        let second = rx.recv().await.unwrap();
        assert_eq!(second.result.unwrap().total_nodes, 3);
        poller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_fetching() {
        let (tx, mut rx) = mpsc::channel(16);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let poller = StatsPoller::spawn_with(Duration::from_secs(10), tx, move || {
            seen.fetch_add(1, Ordering::SeqCst);
            async { Ok(snapshot(0)) }
        })
        .unwrap();
        rx.recv().await.unwrap();
        poller.shutdown().await;

        let before = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn test_zero_period_is_rejected() {
        let (tx, _rx) = mpsc::channel(1);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let result = StatsPoller::spawn_with(Duration::ZERO, tx, move || {
            seen.fetch_add(1, Ordering::SeqCst);
            async { Ok(snapshot(0)) }
        });

        assert_eq!(result.err(), Some(PollerError::ZeroPeriod));
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_interval_is_clamped() {
        assert_eq!(clamp_interval(Duration::from_secs(1)), MIN_POLL_INTERVAL);
        assert_eq!(clamp_interval(Duration::from_secs(20)), Duration::from_secs(20));
        assert_eq!(clamp_interval(Duration::from_secs(120)), MAX_POLL_INTERVAL);
    }
}
