// src/cache.rs
// In-memory TTL cache over fetch results, keyed by endpoint identity plus
// query parameters. Error results are stored too: a 429 stays cached for
// the full TTL so a rate-limited upstream is not hammered again within the
// window. The flip side is that a transient error is sticky until expiry;
// that trade is pinned by tests/cache_ttl.rs.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use metrics::counter;

use crate::fetch::FetchResult;

/// Calendar data moves slowly; the news feeds churn faster.
pub const CALENDAR_TTL: Duration = Duration::from_secs(3600);
pub const NEWS_TTL: Duration = Duration::from_secs(1800);

/// Deterministic composite key: endpoint identity first, then the query
/// parameters that shape the response.
pub fn cache_key(parts: &[&str]) -> String {
    parts.join("|")
}

#[derive(Clone)]
struct CacheEntry {
    result: FetchResult,
    expires_at: Instant,
}

#[derive(Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live hit: return the stored result without touching `producer`.
    /// Miss or expired: run `producer` once, store whatever it returns
    /// (success or error) for `ttl`, and hand it back.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> FetchResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult>,
    {
        if let Some(hit) = self.lookup(key) {
            counter!("dashboard_cache_hits_total").increment(1);
            return hit;
        }
        counter!("dashboard_cache_misses_total").increment(1);

        let result = producer().await;
        let entry = CacheEntry {
            result: result.clone(),
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.to_string(), entry);
        result
    }

    // An expired entry is never served; it is overwritten on the next store.
    fn lookup(&self, key: &str) -> Option<FetchResult> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        let entry = entries.get(key)?;
        if entry.expires_at <= Instant::now() {
            return None;
        }
        Some(entry.result.clone())
    }
}
