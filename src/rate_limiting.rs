// ABOUTME: Fixed-window request limiter for unauthenticated endpoints
// ABOUTME: Keys hits per client and prunes expired entries on every check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Request rate limiting
//!
//! A small in-process limiter for the guest sign-in endpoint: a fixed
//! window of recent hit timestamps per client key. Expired hits are pruned
//! on every check, so memory stays bounded by active clients.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Requests per minute allowed on `POST /auth/guest`, per client IP
pub const GUEST_REQUESTS_PER_MINUTE: u32 = 10;

/// Fixed-window per-key limiter
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    hits: Mutex<HashMap<String, Vec<Instant>>>,
}

impl FixedWindowLimiter {
    /// Create a limiter allowing `limit` hits per `window` per key
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Record a hit for `key`; returns `false` when the key is over its limit
    pub async fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.lock().await;
        let entry = hits.entry(key.to_owned()).or_default();
        entry.retain(|&t| now.duration_since(t) < self.window);
        if entry.len() >= self.limit as usize {
            return false;
        }
        entry.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[tokio::test]
    async fn enforces_limit_per_key() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.check("a").await);
        }
        assert!(!limiter.check("a").await);
        // other keys are unaffected
        assert!(limiter.check("b").await);
    }

    #[tokio::test]
    async fn window_expiry_frees_quota() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.check("a").await);
        assert!(!limiter.check("a").await);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(limiter.check("a").await);
    }
}
