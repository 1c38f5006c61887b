//! Per-route token buckets (`§6` rate limits), keyed by user id for
//! authenticated routes and by remote IP for the unauthenticated
//! webhook intake. One bucket per route category, not global, since
//! a slow withdrawal reviewer shouldn't starve deposit throughput.

use booms_core::config::RateLimitConfig;
use booms_core::BoomsError;
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;

type KeyedLimiter<K> = RateLimiter<K, DefaultKeyedStateStore<K>, DefaultClock>;

pub struct RateLimiters {
    deposit: KeyedLimiter<i64>,
    withdrawal: KeyedLimiter<i64>,
    validation: KeyedLimiter<i64>,
    webhook: KeyedLimiter<String>,
    stats: KeyedLimiter<String>,
}

fn quota(per_minute: u32) -> Quota {
    Quota::per_minute(NonZeroU32::new(per_minute.max(1)).unwrap())
}

impl RateLimiters {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            deposit: RateLimiter::keyed(quota(config.deposit_initiation_per_minute)),
            withdrawal: RateLimiter::keyed(quota(config.withdrawal_initiation_per_minute)),
            validation: RateLimiter::keyed(quota(config.validation_per_minute)),
            webhook: RateLimiter::keyed(quota(config.webhook_per_minute)),
            stats: RateLimiter::keyed(quota(config.stats_per_minute)),
        }
    }

    pub fn check_deposit(&self, user_id: i64) -> Result<(), BoomsError> {
        self.deposit.check_key(&user_id).map_err(|_| BoomsError::RateLimited)
    }

    pub fn check_withdrawal(&self, user_id: i64) -> Result<(), BoomsError> {
        self.withdrawal.check_key(&user_id).map_err(|_| BoomsError::RateLimited)
    }

    pub fn check_validation(&self, user_id: i64) -> Result<(), BoomsError> {
        self.validation.check_key(&user_id).map_err(|_| BoomsError::RateLimited)
    }

    pub fn check_webhook(&self, remote: &str) -> Result<(), BoomsError> {
        self.webhook.check_key(&remote.to_string()).map_err(|_| BoomsError::RateLimited)
    }

    pub fn check_stats(&self, key: &str) -> Result<(), BoomsError> {
        self.stats.check_key(&key.to_string()).map_err(|_| BoomsError::RateLimited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(deposit_per_minute: u32) -> RateLimitConfig {
        RateLimitConfig {
            deposit_initiation_per_minute: deposit_per_minute,
            withdrawal_initiation_per_minute: 3,
            validation_per_minute: 10,
            webhook_per_minute: 60,
            stats_per_minute: 30,
        }
    }

    #[test]
    fn allows_up_to_the_configured_quota() {
        let limiters = RateLimiters::new(&config_with(2));
        assert!(limiters.check_deposit(1).is_ok());
        assert!(limiters.check_deposit(1).is_ok());
        assert!(matches!(limiters.check_deposit(1), Err(BoomsError::RateLimited)));
    }

    #[test]
    fn buckets_are_independent_per_key() {
        let limiters = RateLimiters::new(&config_with(1));
        assert!(limiters.check_deposit(1).is_ok());
        assert!(limiters.check_deposit(1).is_err());
        assert!(limiters.check_deposit(2).is_ok());
    }

    #[test]
    fn webhook_bucket_is_keyed_by_provider_name_not_user() {
        let limiters = RateLimiters::new(&config_with(5));
        for _ in 0..60 {
            assert!(limiters.check_webhook("wave").is_ok());
        }
        assert!(limiters.check_webhook("wave").is_err());
        assert!(limiters.check_webhook("stripe").is_ok());
    }
}
