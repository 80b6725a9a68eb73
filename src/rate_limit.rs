// src/rate_limit.rs
//
// Fixed-window request counting per (source, query). The counter lives in a
// shared store behind `CounterStore`, so the in-process implementation below
// can be swapped for a distributed one without touching the limiter.
//
// This is a hard allow/deny gate: a denied call is rejected for that query,
// never queued or delayed.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use async_trait::async_trait;
use metrics::counter;

use crate::types::Source;

/// Minimal counter-store surface: atomic increment plus expiry, the two
/// operations fixed-window counting needs.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment `key`, creating it at 1, and return the new count.
    async fn incr(&self, key: &str) -> Result<u64>;
    /// Arm expiry for `key`; called once, on the first increment in a window.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<()>;
}

/// Process-local store. Counters are monotonic within a window and vanish
/// only by expiry, never by explicit clear.
#[derive(Default)]
pub struct MemoryCounterStore {
    inner: Mutex<HashMap<String, Counter>>,
}

struct Counter {
    count: u64,
    expires_at: Option<Instant>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr(&self, key: &str) -> Result<u64> {
        let mut map = self.inner.lock().expect("counter mutex poisoned");
        let now = Instant::now();
        map.retain(|_, c| c.expires_at.is_none_or(|t| t > now));

        let c = map.entry(key.to_string()).or_insert(Counter {
            count: 0,
            expires_at: None,
        });
        c.count += 1;
        Ok(c.count)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut map = self.inner.lock().expect("counter mutex poisoned");
        if let Some(c) = map.get_mut(key) {
            c.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub max_requests: u64,
    pub window: Duration,
}

pub struct RateLimiter {
    store: std::sync::Arc<dyn CounterStore>,
    limits: HashMap<Source, RateLimit>,
}

impl RateLimiter {
    pub fn new(store: std::sync::Arc<dyn CounterStore>, limits: HashMap<Source, RateLimit>) -> Self {
        Self { store, limits }
    }

    /// Fixed-window check: increments the window counter and compares it to
    /// the source's budget. Sources without a configured limit always pass.
    pub async fn allow(&self, source: Source, key: &str) -> Result<bool> {
        let Some(limit) = self.limits.get(&source) else {
            return Ok(true);
        };

        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let window = now_ms / limit.window.as_millis().max(1);
        let window_key = format!("{source}:{key}:{window}");

        let count = self.store.incr(&window_key).await?;
        if count == 1 {
            self.store.expire(&window_key, limit.window).await?;
        }

        let allowed = count <= limit.max_requests;
        if !allowed {
            counter!("rate_limit_rejections_total", "source" => source.as_str()).increment(1);
        }
        Ok(allowed)
    }
}
