//! Transfer state for server-render reconciliation.
//!
//! A server render pass fetches data through the object cache as usual; the
//! keys it touched are then snapshotted into a [`TransferPayload`] embedded in
//! the served page. The hydrating client rebuilds a [`TransferState`] from the
//! payload and attaches it to its own cache: the first read of each key
//! consumes the transferred value instead of refetching, after which the key
//! is gone from the transfer state for good.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::store::ObjectCache;

/// Serializable snapshot shipped inside the rendered page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferPayload {
    pub entries: HashMap<String, Value>,
}

impl TransferPayload {
    /// Snapshot the given keys out of a cache populated by a render pass.
    ///
    /// Keys that are absent or already expired are skipped; the payload never
    /// resurrects stale data.
    pub fn record(cache: &ObjectCache, keys: &[String]) -> Self {
        let mut entries = HashMap::new();
        for key in keys {
            if let Some(value) = cache.peek_raw(key) {
                entries.insert(key.clone(), value);
            }
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// One-shot handoff of server-fetched values to a hydrating client.
///
/// Each entry can be taken exactly once; afterwards reads fall through to the
/// cache store and, on miss, to the producer.
pub struct TransferState {
    entries: Mutex<HashMap<String, Value>>,
}

impl TransferState {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Rebuild the state from a payload extracted from the served page.
    pub fn from_payload(payload: TransferPayload) -> Self {
        Self {
            entries: Mutex::new(payload.entries),
        }
    }

    /// Remove and return the transferred value for `key`, if present.
    pub fn take(&self, key: &str) -> Option<Value> {
        self.lock("take").remove(key)
    }

    pub fn len(&self) -> usize {
        self.lock("len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, HashMap<String, Value>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(op, "recovered poisoned transfer lock");
                poisoned.into_inner()
            }
        }
    }
}

impl Default for TransferState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::cache::CacheConfig;

    #[tokio::test]
    async fn recorded_payload_contains_fresh_keys_only() {
        let cache = ObjectCache::new(&CacheConfig::default());
        cache.insert("product_all", &vec!["monitor"], Duration::from_secs(60));

        let payload = TransferPayload::record(
            &cache,
            &["product_all".to_string(), "contact_all".to_string()],
        );

        assert_eq!(payload.len(), 1);
        assert!(payload.entries.contains_key("product_all"));
    }

    #[tokio::test]
    async fn transferred_value_is_consumed_exactly_once() {
        let server = ObjectCache::new(&CacheConfig::default());
        server.insert("product_all", &vec!["monitor", "scanner"], Duration::from_secs(300));
        let payload = TransferPayload::record(&server, &["product_all".to_string()]);

        let wire = serde_json::to_string(&payload).unwrap();
        let decoded: TransferPayload = serde_json::from_str(&wire).unwrap();

        let client = ObjectCache::new(&CacheConfig::default());
        client.attach_transfer(Arc::new(TransferState::from_payload(decoded)));

        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(vec!["refetched".to_string()])
        };

        // First read consumes the transfer, no fetch.
        let first: Vec<String> = client
            .get_or_fetch("product_all", Duration::from_secs(300), fetch)
            .await
            .unwrap();
        assert_eq!(first, vec!["monitor", "scanner"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Second read is served by the store the transfer promoted into.
        let second: Vec<String> = client
            .get_or_fetch("product_all", Duration::from_secs(300), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(vec![])
            })
            .await
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn take_removes_entry_for_good() {
        let mut entries = HashMap::new();
        entries.insert("menu_1".to_string(), serde_json::json!({"id": 1}));
        let state = TransferState::from_payload(TransferPayload { entries });

        assert!(state.take("menu_1").is_some());
        assert!(state.take("menu_1").is_none());
        assert!(state.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn promoted_entry_expires_with_caller_ttl() {
        let client = ObjectCache::new(&CacheConfig::default());
        let mut entries = HashMap::new();
        entries.insert("contact_all".to_string(), serde_json::json!(["office"]));
        client.attach_transfer(Arc::new(TransferState::from_payload(TransferPayload {
            entries,
        })));

        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_secs(5 * 60);

        let _: Vec<String> = client
            .get_or_fetch("contact_all", ttl, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(vec![])
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(6 * 60)).await;

        let _: Vec<String> = client
            .get_or_fetch("contact_all", ttl, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(vec!["fresh".to_string()])
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
