use axum::http::HeaderMap;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::metrics::RATE_LIMIT_KEYS;

// Key used when a request carries no client-identifying header.
// Every such request shares one quota.
pub const UNKNOWN_CLIENT: &str = "unknown";

// Rate limit entry - tracks requests per IP/key
#[derive(Debug, Clone, Copy)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_reset_at: Instant,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub max_per_window: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_per_window: 30,
            window: Duration::from_millis(60_000),
        }
    }
}

/// Fixed-window request counter keyed by client.
///
/// The first request from a key opens a window of `policy.window`; up to
/// `policy.max_per_window` requests are admitted inside it and the rest are
/// rejected until the window has passed. Check-and-increment runs under the
/// shard lock of the key's entry, so concurrent handlers cannot overshoot.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            entries: DashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let fresh = RateLimitEntry {
            count: 1,
            window_reset_at: now + self.policy.window,
        };

        match self.entries.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(fresh);
                true
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();

                // window expired..? start a new one
                if now > entry.window_reset_at {
                    *entry = fresh;
                    return true;
                }

                if entry.count < self.policy.max_per_window {
                    entry.count += 1;
                    return true;
                }

                false
            }
        }
    }

    pub fn entry(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|e| *e)
    }

    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }

    // Drops records whose window has already passed. Returns how many went.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.window_reset_at);
        before.saturating_sub(self.entries.len())
    }
}

/// Derives the quota key for a request: first `x-forwarded-for` hop, then
/// `x-real-ip`, then [`UNKNOWN_CLIENT`].
pub fn client_key(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    real_ip.unwrap_or(UNKNOWN_CLIENT).to_string()
}

// Sweeper - evicts stale records every `every`
pub async fn sweeper(limiter: Arc<RateLimiter>, every: Duration) {
    let mut interval = interval(every);

    tracing::info!(interval = ?every, "rate limit sweeper started");

    loop {
        interval.tick().await;

        let removed = limiter.sweep_expired(Instant::now());
        let remaining = limiter.tracked_keys();
        RATE_LIMIT_KEYS.set(remaining as i64);

        if removed > 0 {
            tracing::debug!(removed, remaining, "swept expired rate limit records");
        }
    }
}
