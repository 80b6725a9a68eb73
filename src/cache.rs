// src/cache.rs
//
// Read-through cache keyed by (source, query). Capacity-bounded with
// least-recently-used eviction, plus a fixed TTL per entry. Only successful
// computations are stored; failures propagate uncached.
//
// No single-flight deduplication: concurrent callers missing on the same key
// may each run the compute function. Future work if provider quotas start to
// hurt.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use metrics::counter;

struct Entry<V> {
    value: V,
    expires_at: Instant,
    last_used: u64,
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    // Monotonic recency stamp; bumped on every touch.
    tick: u64,
}

pub struct TtlCache<V> {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
        }
    }

    /// Fresh-entry lookup. Refreshes recency on hit; expired entries report
    /// as misses.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        inner.tick += 1;
        let tick = inner.tick;
        let entry = inner.entries.get_mut(key)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        entry.last_used = tick;
        Some(entry.value.clone())
    }

    /// Store a value under the fixed TTL, evicting the least-recently-used
    /// entry if the cache is full.
    pub fn insert(&self, key: String, value: V) {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        inner.tick += 1;
        let tick = inner.tick;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            // Expired entries go first; otherwise drop the coldest key.
            let now = Instant::now();
            inner.entries.retain(|_, e| e.expires_at > now);
            if inner.entries.len() >= self.capacity {
                if let Some(coldest) = inner
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_used)
                    .map(|(k, _)| k.clone())
                {
                    inner.entries.remove(&coldest);
                }
            }
        }

        inner.entries.insert(
            key,
            Entry {
                value,
                expires_at: Instant::now() + self.ttl,
                last_used: tick,
            },
        );
    }

    /// Read-through: return the cached value, or run `compute` and store the
    /// result iff it succeeded.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(key) {
            counter!("mentions_cache_hits_total").increment(1);
            return Ok(hit);
        }
        counter!("mentions_cache_misses_total").increment(1);

        let value = compute().await?;
        self.insert(key.to_string(), value.clone());
        Ok(value)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().expect("cache mutex poisoned").entries.len()
    }
}
