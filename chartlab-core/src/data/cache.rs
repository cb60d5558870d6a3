//! In-memory quote cache — TTL memoization with LRU eviction.
//!
//! An explicit instance constructed at startup and handed to the fetch
//! path; there is no process-wide global. Interior locking makes it safe
//! to share across the dispatcher's worker threads.
//!
//! Concurrency note: the lock is not held across the provider call. Two
//! workers missing on the same key at the same time will both fetch and
//! the later insert wins; at-most-one-fetch-per-key is not guaranteed.

use super::provider::{FetchError, FetchRequest, Quote, QuoteProvider};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default validity window of a cached entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default maximum number of distinct keys.
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    ticker: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl CacheKey {
    fn from_request(req: &FetchRequest) -> Self {
        Self {
            ticker: req.ticker.clone(),
            start: req.start,
            end: req.end,
        }
    }
}

struct CacheEntry {
    quote: Quote,
    inserted_at: Instant,
    last_used: u64,
}

struct CacheInner {
    entries: HashMap<CacheKey, CacheEntry>,
    // Monotonic use counter; the entry with the smallest stamp is the LRU victim.
    clock: u64,
}

/// TTL + LRU memoization of quote fetches.
pub struct QuoteCache {
    inner: Mutex<CacheInner>,
    ttl: Duration,
    capacity: usize,
}

impl QuoteCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        assert!(capacity >= 1, "cache capacity must be >= 1");
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                clock: 0,
            }),
            ttl,
            capacity,
        }
    }

    /// The dashboard defaults: 24-hour TTL, 100 entries.
    pub fn default_dashboard() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    /// Return the cached quote for `req`, or fetch and store it.
    ///
    /// A hit within the TTL never touches the provider. Errors are returned
    /// to the caller and never cached.
    pub fn get_or_fetch(
        &self,
        provider: &dyn QuoteProvider,
        req: &FetchRequest,
    ) -> Result<Quote, FetchError> {
        let key = CacheKey::from_request(req);

        if let Some(quote) = self.lookup(&key) {
            debug!(ticker = %req.ticker, "cache hit");
            return Ok(quote);
        }

        debug!(ticker = %req.ticker, provider = provider.name(), "cache miss, fetching");
        let quote = provider.fetch(req)?;
        self.insert(key, quote.clone());
        Ok(quote)
    }

    /// Number of live (possibly expired) entries.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &CacheKey) -> Option<Quote> {
        let mut inner = self.inner.lock().unwrap();

        let expired = match inner.entries.get(key) {
            Some(entry) => entry.inserted_at.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            inner.entries.remove(key);
            return None;
        }

        inner.clock += 1;
        let stamp = inner.clock;
        let entry = inner
            .entries
            .get_mut(key)
            .expect("entry checked above while holding the lock");
        entry.last_used = stamp;
        Some(entry.quote.clone())
    }

    fn insert(&self, key: CacheKey, quote: Quote) {
        let mut inner = self.inner.lock().unwrap();

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            if let Some(victim) = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone())
            {
                debug!(ticker = %victim.ticker, "evicting least-recently-used entry");
                inner.entries.remove(&victim);
            }
        }

        inner.clock += 1;
        let stamp = inner.clock;
        inner.entries.insert(
            key,
            CacheEntry {
                quote,
                inserted_at: Instant::now(),
                last_used: stamp,
            },
        );
    }
}
