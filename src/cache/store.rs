//! Object cache storage.
//!
//! Key → value entries with a per-entry deadline. Reads that miss (absent or
//! expired) run the caller's fetch closure; concurrent misses for the same key
//! are coalesced through a per-key flight guard so the upstream is asked once.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use metrics::counter;
use regex::Regex;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::config::CacheConfig;
use super::transfer::TransferState;

const SOURCE: &str = "cache::store";

/// A cached value and the deadline after which it no longer counts as a hit.
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// TTL object cache with request coalescing and pattern invalidation.
///
/// One instance is created at application start and handed to every
/// data-access service. Entries expire lazily on read; a background sweep
/// reclaims the rest. An optional [`TransferState`] is consulted on miss so a
/// hydrating client can reuse values fetched during the server render.
pub struct ObjectCache {
    enabled: bool,
    entries: RwLock<HashMap<String, CacheEntry>>,
    flights: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    transfer: RwLock<Option<Arc<TransferState>>>,
}

impl ObjectCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            enabled: config.enabled,
            entries: RwLock::new(HashMap::new()),
            flights: Mutex::new(HashMap::new()),
            transfer: RwLock::new(None),
        }
    }

    /// Whether the cache is enabled. When disabled every read goes upstream.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Attach a transfer state consulted on store misses.
    ///
    /// Hydration installs this once; entries are consumed one read at a time
    /// via [`TransferState::take`].
    pub fn attach_transfer(&self, transfer: Arc<TransferState>) {
        *rw_write(&self.transfer, "attach_transfer") = Some(transfer);
    }

    /// Return the cached value for `key` if fresh, otherwise run `fetch`,
    /// store the result under `key` with the given `ttl`, and return it.
    ///
    /// `fetch` runs at most once per call. On failure nothing is written and
    /// any stale entry for `key` is left in place. A miss that races another
    /// miss for the same key waits for the in-flight fetch instead of issuing
    /// its own.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.enabled {
            return fetch().await;
        }

        if let Some(value) = self.lookup(key) {
            return Ok(value);
        }

        if let Some(value) = self.replay_transfer(key, ttl) {
            return Ok(value);
        }

        let flight = self.flight_for(key);
        let _guard = flight.lock().await;

        // Another caller may have landed the value while we waited.
        if let Some(value) = self.lookup(key) {
            counter!("vitrina_cache_coalesced_total").increment(1);
            self.release_flight(key, &flight);
            return Ok(value);
        }

        counter!("vitrina_cache_miss_total").increment(1);
        debug!(key, "cache miss, fetching upstream");

        let outcome = fetch().await;
        if let Ok(value) = &outcome {
            self.store(key, value, ttl);
        }
        self.release_flight(key, &flight);
        outcome
    }

    /// Write a value directly, bypassing any fetch. Used by warmup and
    /// transfer promotion.
    pub fn insert<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if !self.enabled {
            return;
        }
        self.store(key, value, ttl);
    }

    /// Remove one entry. Absent keys are not an error.
    pub fn invalidate(&self, key: &str) {
        if rw_write(&self.entries, "invalidate").remove(key).is_some() {
            counter!("vitrina_cache_invalidated_total").increment(1);
            debug!(key, "cache entry invalidated");
        }
    }

    /// Remove every entry whose key matches `pattern`.
    pub fn invalidate_pattern(&self, pattern: &Regex) {
        let mut entries = rw_write(&self.entries, "invalidate_pattern");
        let before = entries.len();
        entries.retain(|key, _| !pattern.is_match(key));
        let removed = before - entries.len();
        if removed > 0 {
            counter!("vitrina_cache_invalidated_total").increment(removed as u64);
            debug!(pattern = %pattern, removed, "cache entries invalidated by pattern");
        }
    }

    /// Empty the store.
    pub fn invalidate_all(&self) {
        let mut entries = rw_write(&self.entries, "invalidate_all");
        let removed = entries.len();
        entries.clear();
        if removed > 0 {
            counter!("vitrina_cache_invalidated_total").increment(removed as u64);
        }
    }

    /// Drop entries past their deadline. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, "sweep_expired");
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        let removed = before - entries.len();
        if removed > 0 {
            counter!("vitrina_cache_expired_total").increment(removed as u64);
            debug!(removed, "expired cache entries swept");
        }
        removed
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, "len").len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw value for `key` if still fresh. Used when recording a transfer
    /// payload after a render pass.
    pub fn peek_raw(&self, key: &str) -> Option<Value> {
        let entries = rw_read(&self.entries, "peek_raw");
        let entry = entries.get(key)?;
        entry.is_fresh(Instant::now()).then(|| entry.value.clone())
    }

    fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = {
            let entries = rw_read(&self.entries, "lookup");
            let entry = entries.get(key)?;
            if !entry.is_fresh(Instant::now()) {
                counter!("vitrina_cache_expired_total").increment(1);
                return None;
            }
            entry.value.clone()
        };

        match serde_json::from_value(raw) {
            Ok(value) => {
                counter!("vitrina_cache_hit_total").increment(1);
                Some(value)
            }
            Err(error) => {
                warn!(
                    key,
                    %error,
                    target_module = SOURCE,
                    "cached value failed to decode, dropping entry"
                );
                self.invalidate(key);
                None
            }
        }
    }

    fn replay_transfer<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let raw = {
            let transfer = rw_read(&self.transfer, "replay_transfer");
            transfer.as_ref()?.take(key)?
        };

        counter!("vitrina_cache_transfer_hit_total").increment(1);
        debug!(key, "transfer state consumed");

        let mut entries = rw_write(&self.entries, "replay_transfer.store");
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: raw.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        drop(entries);

        match serde_json::from_value(raw) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(
                    key,
                    %error,
                    target_module = SOURCE,
                    "transferred value failed to decode, falling back to fetch"
                );
                self.invalidate(key);
                None
            }
        }
    }

    fn store<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_value(value) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(
                    key,
                    %error,
                    target_module = SOURCE,
                    "value could not be serialized, not caching"
                );
                return;
            }
        };

        rw_write(&self.entries, "store").insert(
            key.to_string(),
            CacheEntry {
                value: raw,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn flight_for(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut flights = mutex_lock(&self.flights, "flight_for");
        flights
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn release_flight(&self, key: &str, flight: &Arc<tokio::sync::Mutex<()>>) {
        let mut flights = mutex_lock(&self.flights, "release_flight");
        if flights.get(key).is_some_and(|current| Arc::ptr_eq(current, flight)) {
            flights.remove(key);
        }
    }
}

// Lock acquisition with poison recovery. A panicked writer leaves the map in
// whatever state it reached; entries are droppable at any time, so recovering
// is always safe here.

fn rw_read<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockReadGuard<'a, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(op, target_module = SOURCE, "recovered poisoned cache read lock");
            poisoned.into_inner()
        }
    }
}

fn rw_write<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockWriteGuard<'a, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(op, target_module = SOURCE, "recovered poisoned cache write lock");
            poisoned.into_inner()
        }
    }
}

fn mutex_lock<'a, T>(lock: &'a Mutex<T>, op: &'static str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(op, target_module = SOURCE, "recovered poisoned flight lock");
            poisoned.into_inner()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn cache() -> ObjectCache {
        ObjectCache::new(&CacheConfig::default())
    }

    async fn fetch_list(calls: &AtomicUsize) -> Result<Vec<String>, Infallible> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["stethoscope".to_string(), "defibrillator".to_string()])
    }

    #[tokio::test]
    async fn second_read_within_ttl_does_not_fetch() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_secs(300);

        let first: Vec<String> = cache
            .get_or_fetch("product_all", ttl, || fetch_list(&calls))
            .await
            .unwrap();
        let second: Vec<String> = cache
            .get_or_fetch("product_all", ttl, || fetch_list(&calls))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_ttl() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_secs(5 * 60);

        let _: Vec<String> = cache
            .get_or_fetch("product_all", ttl, || fetch_list(&calls))
            .await
            .unwrap();

        // Two minutes later the entry is still fresh.
        tokio::time::advance(Duration::from_secs(2 * 60)).await;
        let _: Vec<String> = cache
            .get_or_fetch("product_all", ttl, || fetch_list(&calls))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Four more minutes puts the entry past its deadline.
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        let _: Vec<String> = cache
            .get_or_fetch("product_all", ttl, || fetch_list(&calls))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_secs(300);

        let _: Vec<String> = cache
            .get_or_fetch("item_all", ttl, || fetch_list(&calls))
            .await
            .unwrap();
        cache.invalidate("item_all");
        let _: Vec<String> = cache
            .get_or_fetch("item_all", ttl, || fetch_list(&calls))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn pattern_invalidation_removes_only_matches() {
        let cache = cache();
        let ttl = Duration::from_secs(300);

        cache.insert("carousel_company_1", &"a", ttl);
        cache.insert("carousel_company_2", &"b", ttl);
        cache.insert("carousel_all", &"c", ttl);
        cache.insert("item_all", &"d", ttl);

        cache.invalidate_pattern(&Regex::new("^carousel_company_").unwrap());

        assert!(cache.peek_raw("carousel_company_1").is_none());
        assert!(cache.peek_raw("carousel_company_2").is_none());
        assert!(cache.peek_raw("carousel_all").is_some());
        assert!(cache.peek_raw("item_all").is_some());
    }

    #[tokio::test]
    async fn fetch_error_leaves_store_untouched() {
        let cache = cache();
        let ttl = Duration::from_secs(300);

        cache.insert("user_7", &"cached", ttl);

        let result: Result<String, &str> = cache
            .get_or_fetch("user_9", ttl, || async { Err("upstream down") })
            .await;
        assert!(result.is_err());
        assert!(cache.peek_raw("user_9").is_none());

        // The unrelated entry survives.
        assert!(cache.peek_raw("user_7").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_fetch_once() {
        let cache = Arc::new(cache());
        let calls = Arc::new(AtomicUsize::new(0));
        let ttl = Duration::from_secs(300);

        let slow_fetch = |calls: Arc<AtomicUsize>| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, Infallible>(vec![1u32, 2, 3])
        };

        let a = {
            let cache = cache.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch("menus_all", ttl, || slow_fetch(calls))
                    .await
                    .unwrap()
            })
        };
        let b = {
            let cache = cache.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch("menus_all", ttl, || slow_fetch(calls))
                    .await
                    .unwrap()
            })
        };

        let (left, right) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(left, right);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_flight_releases_key_for_retry() {
        let cache = cache();
        let ttl = Duration::from_secs(300);

        let failed: Result<String, &str> = cache
            .get_or_fetch("contact_all", ttl, || async { Err("boom") })
            .await;
        assert!(failed.is_err());

        let recovered: Result<String, &str> = cache
            .get_or_fetch("contact_all", ttl, || async { Ok("ok".to_string()) })
            .await;
        assert_eq!(recovered.unwrap(), "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_drops_only_expired_entries() {
        let cache = cache();

        cache.insert("contact_all", &"a", Duration::from_secs(60));
        cache.insert("product_all", &"b", Duration::from_secs(600));

        tokio::time::advance(Duration::from_secs(120)).await;

        assert_eq!(cache.sweep_expired(), 1);
        assert!(cache.peek_raw("contact_all").is_none());
        assert!(cache.peek_raw("product_all").is_some());
    }

    #[tokio::test]
    async fn disabled_cache_always_fetches() {
        let cache = ObjectCache::new(&CacheConfig {
            enabled: false,
            ..Default::default()
        });
        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_secs(300);

        let _: Vec<String> = cache
            .get_or_fetch("product_all", ttl, || fetch_list(&calls))
            .await
            .unwrap();
        let _: Vec<String> = cache
            .get_or_fetch("product_all", ttl, || fetch_list(&calls))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn store_recovers_from_poisoned_lock() {
        let cache = cache();

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = cache
                .entries
                .write()
                .expect("entries lock should be acquired");
            panic!("poison entries lock");
        }));

        cache.insert("product_1", &"value", Duration::from_secs(60));
        assert!(cache.peek_raw("product_1").is_some());
    }
}
