// Outbound rate limiter for classifier APIs.
//
// Some upstream classifiers (Perspective's free tier is 1 QPS) throttle
// aggressively. Producers hold one of these and call `acquire` before each
// request. Requests are spaced at least `interval` apart; callers past the
// budget sleep until the spacing has elapsed.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Spaces out outbound requests to at most `requests_per_second`.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

struct RateLimiterInner {
    interval: Duration,
    /// When the last request was let through
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(requests_per_second: f64) -> Self {
        let interval = Duration::from_secs_f64(1.0 / requests_per_second);
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                interval,
                last_request: None,
            })),
        }
    }

    /// Wait until a request may go out.
    ///
    /// The lock is held across the sleep, so waiters are served in arrival
    /// order. `last_request` is only written once the wait completes: a
    /// caller cancelled mid-wait (e.g. by a producer timeout) releases the
    /// lock and consumes nothing.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(last) = inner.last_request {
            tokio::time::sleep_until(last + inner.interval).await;
        }
        inner.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_request_is_immediate() {
        let limiter = RateLimiter::new(1.0);
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn second_request_waits_for_interval() {
        let limiter = RateLimiter::new(4.0); // 250ms spacing
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(200),
            "Expected ~250ms delay, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn concurrent_callers_are_spaced_out() {
        let limiter = RateLimiter::new(10.0); // 100ms spacing
        let start = Instant::now();
        let a = limiter.clone();
        let b = limiter.clone();
        let c = limiter.clone();
        tokio::join!(a.acquire(), b.acquire(), c.acquire());
        // Third slot opens ~200ms after the first
        assert!(start.elapsed() >= Duration::from_millis(180));
    }

    #[tokio::test]
    async fn cancelled_waiters_do_not_hold_slots() {
        let limiter = RateLimiter::new(20.0); // 50ms spacing
        let start = Instant::now();

        let waiters = (0..10).map(|_| {
            let limiter = limiter.clone();
            async move {
                tokio::time::timeout(Duration::from_millis(120), limiter.acquire())
                    .await
                    .is_ok()
            }
        });
        let served = futures::future::join_all(waiters)
            .await
            .into_iter()
            .filter(|ok| *ok)
            .count();
        assert!((1..10).contains(&served), "served {served}");

        // Last real request went out by ~120ms; the next slot is long open
        tokio::time::sleep_until(start + Duration::from_millis(200)).await;
        let before = Instant::now();
        limiter.acquire().await;
        let waited = before.elapsed();
        assert!(
            waited < Duration::from_millis(30),
            "fresh caller waited {waited:?}"
        );
    }
}
