use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Raised when a caller exhausted its request budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Rate limit exceeded, retry after {retry_after:?}")]
pub struct RateLimited {
    pub retry_after: Duration,
}

impl RateLimited {
    /// Whole seconds to wait, never zero
    pub fn retry_after_secs(&self) -> u64 {
        retry_after_secs(self.retry_after)
    }
}

fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

type RequestLog = Arc<Mutex<VecDeque<Instant>>>;

/// Sliding-window rate limiter keyed by caller identity
///
/// Each caller may make at most `max_requests` requests in any trailing
/// `window`. Request timestamps live in a per-caller log; logs of callers
/// idle for a full window are evicted.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    logs: moka::sync::Cache<String, RequestLog>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        let logs = moka::sync::Cache::builder()
            .time_to_idle(window)
            .build();

        Self {
            max_requests: max_requests as usize,
            window,
            logs,
        }
    }

    /// Record a request for `key` if it fits in the current window
    pub fn check(&self, key: &str) -> Result<(), RateLimited> {
        self.check_at(key, Instant::now())
    }

    /// Same as [`RateLimiter::check`] with an explicit clock reading
    pub fn check_at(&self, key: &str, now: Instant) -> Result<(), RateLimited> {
        let log = self
            .logs
            .get_with(key.to_string(), || Arc::new(Mutex::new(VecDeque::new())));
        let mut log = log.lock().unwrap_or_else(PoisonError::into_inner);

        while let Some(&oldest) = log.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                log.pop_front();
            } else {
                break;
            }
        }

        if log.len() >= self.max_requests {
            let retry_after = log
                .front()
                .map(|&oldest| self.window.saturating_sub(now.saturating_duration_since(oldest)))
                .unwrap_or(self.window);

            tracing::debug!("Rate limit hit for {} ({} requests in window)", key, log.len());
            return Err(RateLimited { retry_after });
        }

        log.push_back(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let start = Instant::now();

        for i in 0..3 {
            assert!(limiter.check_at("u1", start + Duration::from_secs(i)).is_ok());
        }

        let err = limiter
            .check_at("u1", start + Duration::from_secs(10))
            .unwrap_err();
        assert_eq!(err.retry_after, Duration::from_secs(50));
        assert_eq!(err.retry_after_secs(), 50);
    }

    #[test]
    fn test_window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10));
        let start = Instant::now();

        assert!(limiter.check_at("u1", start).is_ok());
        assert!(limiter.check_at("u1", start + Duration::from_secs(5)).is_ok());
        assert!(limiter.check_at("u1", start + Duration::from_secs(9)).is_err());

        // The first request has left the window, the second has not
        assert!(limiter.check_at("u1", start + Duration::from_secs(10)).is_ok());
        assert!(limiter.check_at("u1", start + Duration::from_secs(11)).is_err());
    }

    #[test]
    fn test_rejected_requests_do_not_count() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();

        assert!(limiter.check_at("u1", start).is_ok());
        for i in 1..5 {
            assert!(limiter.check_at("u1", start + Duration::from_secs(i)).is_err());
        }
        assert!(limiter.check_at("u1", start + Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn test_callers_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("u1", now).is_ok());
        assert!(limiter.check_at("u1", now).is_err());
        assert!(limiter.check_at("u2", now).is_ok());
    }

    #[test]
    fn test_zero_budget_always_rejects() {
        let limiter = RateLimiter::new(0, Duration::from_secs(30));
        let err = limiter.check("u1").unwrap_err();
        assert_eq!(err.retry_after, Duration::from_secs(30));
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(1500)), 2);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }
}
