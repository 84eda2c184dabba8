//! Rate limiting for the public proxy endpoints.
//!
//! The call and chat proxies are unauthenticated, so limiting is keyed by the
//! widget API key carried in the request body, with demo and keyless traffic
//! sharing fixed buckets. Handlers call [`RateLimiterState::check`] after
//! parsing the body, before any database or provider work.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use std::{
    collections::HashMap,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};

/// Bucket key for demo traffic.
pub const DEMO_BUCKET: &str = "demo";

/// Bucket key for requests carrying neither an API key nor the demo flag.
pub const ANONYMOUS_BUCKET: &str = "anonymous";

/// Type alias for the rate limiter used per bucket.
type KeyRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across all requests.
/// Uses a HashMap keyed by widget API key with individual rate limiters.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<String, Arc<KeyRateLimiter>>>,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            rate_limit_per_minute,
        }
    }

    /// Get or create a rate limiter for the given bucket key.
    fn get_or_create_limiter(&self, key: &str) -> Arc<KeyRateLimiter> {
        {
            let limiters = self.limiters.read().unwrap();
            if let Some(limiter) = limiters.get(key) {
                return limiter.clone();
            }
        }

        let mut limiters = self.limiters.write().unwrap();

        // Double-check in case another thread created it
        if let Some(limiter) = limiters.get(key) {
            return limiter.clone();
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.rate_limit_per_minute).unwrap_or(NonZeroU32::new(60).unwrap()),
        );
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(key.to_string(), limiter.clone());
        limiter
    }

    /// Check if a request for the given bucket should be allowed.
    /// Returns Ok(()) if allowed, or Err with retry_after seconds if limited.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(key);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                Err(wait_time.as_secs().max(1))
            }
        }
    }

    /// Bucket key for a request: the widget API key when present, otherwise
    /// the demo or anonymous shared bucket.
    pub fn bucket_for<'a>(api_key: Option<&'a str>, is_demo: bool) -> &'a str {
        match api_key {
            Some(key) => key,
            None if is_demo => DEMO_BUCKET,
            None => ANONYMOUS_BUCKET,
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_requests() {
        let state = RateLimiterState::new(60);
        assert!(state.check("wgt_test").is_ok());
    }

    #[test]
    fn test_rate_limiter_exhaustion() {
        let state = RateLimiterState::new(1);

        assert!(state.check("wgt_test").is_ok());

        let result = state.check("wgt_test");
        assert!(result.is_err());
        assert!(result.unwrap_err() >= 1);
    }

    #[test]
    fn test_rate_limiter_buckets_independent() {
        let state = RateLimiterState::new(1);

        assert!(state.check("wgt_a").is_ok());
        assert!(state.check("wgt_b").is_ok());
        assert!(state.check(DEMO_BUCKET).is_ok());

        assert!(state.check("wgt_a").is_err());
        assert!(state.check("wgt_b").is_err());
        assert!(state.check(DEMO_BUCKET).is_err());
    }

    #[test]
    fn test_rate_limiter_same_bucket_multiple_checks() {
        let state = RateLimiterState::new(5);

        for i in 0..5 {
            assert!(state.check("wgt_x").is_ok(), "Request {} should be allowed", i);
        }
        assert!(state.check("wgt_x").is_err());
    }

    #[test]
    fn test_bucket_for() {
        assert_eq!(RateLimiterState::bucket_for(Some("wgt_abc"), false), "wgt_abc");
        assert_eq!(RateLimiterState::bucket_for(Some("wgt_abc"), true), "wgt_abc");
        assert_eq!(RateLimiterState::bucket_for(None, true), DEMO_BUCKET);
        assert_eq!(RateLimiterState::bucket_for(None, false), ANONYMOUS_BUCKET);
    }

    #[test]
    fn test_rate_limiter_get_or_create_idempotent() {
        let state = RateLimiterState::new(60);

        let limiter1 = state.get_or_create_limiter("wgt_same");
        let limiter2 = state.get_or_create_limiter("wgt_same");
        assert!(Arc::ptr_eq(&limiter1, &limiter2));

        let limiter3 = state.get_or_create_limiter("wgt_other");
        assert!(!Arc::ptr_eq(&limiter1, &limiter3));
    }

    #[test]
    fn test_rate_limiter_state_debug() {
        let state = RateLimiterState::new(60);
        state.check("wgt_one").unwrap();
        let debug = format!("{:?}", state);
        assert!(debug.contains("RateLimiterState"));
        assert!(debug.contains("active_limiters"));
    }
}
