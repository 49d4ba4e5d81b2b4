//! Per-user flood protection.

use dashmap::DashMap;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::num::NonZeroU32;

/// Token bucket per (chat, user), created on first message.
#[derive(Debug)]
pub struct FloodGuard {
    limiters: DashMap<(i64, i64), DefaultDirectRateLimiter>,
    quota: Quota,
}

impl FloodGuard {
    /// Entries kept before the map is cleared wholesale.
    const MAX_ENTRIES: usize = 10_000;

    pub fn new(messages_per_second: u32, burst: u32) -> Self {
        let rate = NonZeroU32::new(messages_per_second).unwrap_or(nonzero!(2u32));
        let burst = NonZeroU32::new(burst).unwrap_or(nonzero!(5u32));

        Self {
            limiters: DashMap::new(),
            quota: Quota::per_second(rate).allow_burst(burst),
        }
    }

    /// Charge one message. Returns `false` once the user is over quota.
    pub fn check(&self, chat_id: i64, user_id: i64) -> bool {
        if self.limiters.len() > Self::MAX_ENTRIES {
            self.limiters.clear();
        }

        self.limiters
            .entry((chat_id, user_id))
            .or_insert_with(|| RateLimiter::direct(self.quota))
            .check()
            .is_ok()
    }

    pub fn remove(&self, chat_id: i64, user_id: i64) {
        self.limiters.remove(&(chat_id, user_id));
    }
}
