//! Rate limiting for the auth route group.
//!
//! A fixed 60-second window per client key, 10 admissions per window. The
//! bucket read-modify-write happens under one lock so concurrent requests
//! sharing a key cannot race; a denial leaves the counter untouched.

use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

pub trait RateLimiter: Send + Sync {
    /// Admit or deny a request for the given client key. On `Allowed` the
    /// admission is recorded; on `Limited` no state changes.
    fn admit(&self, key: &str) -> RateLimitDecision;
}

/// Limiter that admits everything. Used where throttling is out of scope,
/// e.g. most tests.
#[derive(Clone, Debug)]
pub struct NoopRateLimiter;

impl RateLimiter for NoopRateLimiter {
    fn admit(&self, _key: &str) -> RateLimitDecision {
        RateLimitDecision::Allowed
    }
}

#[derive(Debug)]
struct Bucket {
    count: u32,
    window_start: Instant,
}

/// Fixed-window counter store keyed by client address.
///
/// Buckets are created lazily, reset when their window elapses, and evicted
/// once idle for a full window so total memory stays bounded by key churn.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    window: Duration,
    limit: u32,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl FixedWindowLimiter {
    #[must_use]
    pub fn new(window: Duration, limit: u32) -> Self {
        Self {
            window,
            limit,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    fn admit_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // Evict buckets whose window elapsed; a stale count never outlives
        // its window, and idle keys do not accumulate.
        buckets.retain(|_, bucket| now.duration_since(bucket.window_start) < self.window);

        let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
            count: 0,
            window_start: now,
        });

        if bucket.count >= self.limit {
            return RateLimitDecision::Limited;
        }

        bucket.count += 1;
        RateLimitDecision::Allowed
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_LIMIT)
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn admit(&self, key: &str) -> RateLimitDecision {
        self.admit_at(key, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_rate_limiter_allows() {
        let limiter = NoopRateLimiter;
        assert_eq!(limiter.admit("1.2.3.4"), RateLimitDecision::Allowed);
    }

    #[test]
    fn eleventh_request_in_window_is_denied() {
        let limiter = FixedWindowLimiter::default();
        let now = Instant::now();
        for _ in 0..DEFAULT_LIMIT {
            assert_eq!(limiter.admit_at("1.2.3.4", now), RateLimitDecision::Allowed);
        }
        assert_eq!(limiter.admit_at("1.2.3.4", now), RateLimitDecision::Limited);
    }

    #[test]
    fn denial_does_not_inflate_counter() {
        let limiter = FixedWindowLimiter::new(DEFAULT_WINDOW, 1);
        let now = Instant::now();
        assert_eq!(limiter.admit_at("key", now), RateLimitDecision::Allowed);
        for _ in 0..5 {
            assert_eq!(limiter.admit_at("key", now), RateLimitDecision::Limited);
        }
        // The window resets once elapsed, regardless of how many denials
        // happened in between.
        let later = now + DEFAULT_WINDOW;
        assert_eq!(limiter.admit_at("key", later), RateLimitDecision::Allowed);
    }

    #[test]
    fn keys_are_throttled_independently() {
        let limiter = FixedWindowLimiter::new(DEFAULT_WINDOW, 1);
        let now = Instant::now();
        assert_eq!(limiter.admit_at("a", now), RateLimitDecision::Allowed);
        assert_eq!(limiter.admit_at("a", now), RateLimitDecision::Limited);
        assert_eq!(limiter.admit_at("b", now), RateLimitDecision::Allowed);
    }

    #[test]
    fn idle_buckets_are_evicted() {
        let limiter = FixedWindowLimiter::default();
        let now = Instant::now();
        for i in 0..100 {
            limiter.admit_at(&format!("10.0.0.{i}"), now);
        }
        let later = now + DEFAULT_WINDOW;
        limiter.admit_at("fresh", later);
        let buckets = limiter.buckets.lock().expect("lock");
        assert_eq!(buckets.len(), 1);
    }
}
