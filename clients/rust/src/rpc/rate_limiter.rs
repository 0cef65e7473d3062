//! Token bucket rate limiter for RPC requests.
//!
//! Prevents overwhelming RPC endpoints; built on the `governor` crate.

use std::num::NonZeroU32;

use crate::config::RateLimitConfig;
use crate::errors::ClientResult;

/// A token bucket rate limiter for RPC requests.
pub struct RpcRateLimiter {
    limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

/// Guard returned when a rate limit slot is acquired.
/// Exists mainly for future extensions (e.g., tracking active requests).
pub struct RateLimitGuard {
    _private: (),
}

impl RpcRateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        // A zero in the config degrades to the slowest limiter, not a panic.
        let quota =
            governor::Quota::per_second(NonZeroU32::new(config.max_rps).unwrap_or(NonZeroU32::MIN))
                .allow_burst(NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN));

        Self {
            limiter: governor::RateLimiter::direct(quota),
        }
    }

    /// Create a rate limiter that effectively never limits (for testing).
    pub fn unlimited() -> Self {
        Self::new(RateLimitConfig {
            max_rps: u32::MAX,
            burst_size: u32::MAX,
        })
    }

    /// Acquire a rate limit slot, waiting until one is available.
    pub async fn acquire(&self) -> ClientResult<RateLimitGuard> {
        self.limiter.until_ready().await;
        Ok(RateLimitGuard { _private: () })
    }
}
