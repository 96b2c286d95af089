//! Distributed-cache capability consumed by the credential broker.
//!
//! The broker treats the cache as a plain key/value store and never mutates
//! an entry in place (read-then-overwrite only). Production deployments
//! inject an adapter over the shared distributed cache; tests and the CLI
//! use the in-memory implementation.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use utilink_core::AccountId;

/// Derived cache key for the bearer-token credential entry.
pub fn token_cache_key(token: &str) -> String {
    format!("authentication:{token}")
}

/// Derived cache key for the business-partner-number credential entry.
pub fn account_cache_key(account: &AccountId) -> String {
    format!("authentication:mcf:nojwt:{account}")
}

/// Injected key/value capability; implementations are shared across all
/// service instances.
pub trait CredentialCache: Send + Sync {
    fn get<'a>(&'a self, key: &'a str)
        -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;

    fn set<'a>(
        &'a self,
        key: String,
        value: String,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheInner {
    map: HashMap<String, CacheEntry>,
    default_ttl: Duration,
}

impl CacheInner {
    fn new(default_ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            default_ttl,
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    fn put(&mut self, key: String, value: String) {
        let expires_at = Instant::now() + self.default_ttl;
        self.map.insert(key, CacheEntry { value, expires_at });
    }
}

/// Thread-safe in-memory credential cache with a TTL expiry policy.
///
/// The TTL is this cache's policy, not the broker's: the broker stores
/// entries without an explicit expiry, matching the upstream contract.
#[derive(Debug, Clone)]
pub struct MemoryCredentialCache {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl MemoryCredentialCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new(default_ttl))),
        }
    }

    /// One-hour TTL, matching the upstream session lifetime.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(3600))
    }

    /// A cache that never stores anything (every lookup misses).
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl CredentialCache for MemoryCredentialCache {
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move {
            let store = self.inner.read().await;
            store.get(key)
        })
    }

    fn set<'a>(
        &'a self,
        key: String,
        value: String,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let mut store = self.inner.write().await;
            if store.default_ttl == Duration::ZERO {
                return;
            }
            store.put(key, value);
        })
    }
}
