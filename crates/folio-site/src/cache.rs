//! Stale-while-revalidate caching with moka.
//!
//! Resolved content is kept for a fixed revalidation window. Within the
//! window a lookup is a plain cache hit. Once the window has passed, the
//! lookup still returns the cached value immediately and re-resolves it in
//! a background task; only a cold key ever waits on the backend.
//!
//! ## Refresh outcomes
//!
//! | Refresh result | Effect |
//! |----------------|--------|
//! | `Ok(Some(v))`  | replaces the cached value, restarts the window |
//! | `Ok(None)`     | evicts the key (the content is gone) |
//! | `Err(_)`       | keeps serving the stale value, logs a warning |
//!
//! `None` results are never cached, so content published after a miss is
//! picked up by the very next request.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::query::ContentError;

/// Default number of cached keys.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default revalidation window.
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
struct Stamped<V> {
    value: V,
    fetched_at: Instant,
}

impl<V> Stamped<V> {
    fn now(value: V) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }
}

/// Cache that serves stale values while refreshing them in the background.
pub struct RevalidatingCache<V> {
    entries: Cache<String, Stamped<V>>,
    window: Duration,
    refreshing: Arc<Mutex<HashSet<String>>>,
}

impl<V> Clone for RevalidatingCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            window: self.window,
            refreshing: Arc::clone(&self.refreshing),
        }
    }
}

impl<V> RevalidatingCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(window: Duration) -> Self {
        Self::with_capacity(window, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(window: Duration, capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
            window,
            refreshing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// The revalidation window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Get a cached value, or resolve and cache it.
    ///
    /// `resolve` may be called again later from a background task, so it
    /// must own everything it needs.
    pub async fn get_or_resolve<F, Fut>(
        &self,
        key: &str,
        resolve: F,
    ) -> Result<Option<V>, ContentError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<V>, ContentError>> + Send + 'static,
    {
        if let Some(stamped) = self.entries.get(key).await {
            let age = stamped.fetched_at.elapsed();
            if age < self.window {
                tracing::debug!(key = %key, age_ms = age.as_millis() as u64, "cache hit");
            } else {
                tracing::debug!(key = %key, age_ms = age.as_millis() as u64, "stale hit, revalidating");
                self.spawn_refresh(key, resolve);
            }
            return Ok(Some(stamped.value));
        }

        tracing::debug!(key = %key, "cache miss, resolving");
        let value = resolve().await?;
        if let Some(v) = &value {
            self.entries
                .insert(key.to_string(), Stamped::now(v.clone()))
                .await;
        }
        Ok(value)
    }

    /// Drop a key so the next lookup resolves cold.
    pub async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    /// Whether a background refresh is running for `key`.
    pub fn is_refreshing(&self, key: &str) -> bool {
        self.refreshing.lock().contains(key)
    }

    fn spawn_refresh<F, Fut>(&self, key: &str, resolve: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<V>, ContentError>> + Send + 'static,
    {
        // One refresh per key at a time.
        if !self.refreshing.lock().insert(key.to_string()) {
            return;
        }

        let entries = self.entries.clone();
        let refreshing = Arc::clone(&self.refreshing);
        let key = key.to_string();

        tokio::spawn(async move {
            let _guard = RefreshGuard {
                refreshing,
                key: key.clone(),
            };
            match resolve().await {
                Ok(Some(value)) => {
                    entries.insert(key.clone(), Stamped::now(value)).await;
                    tracing::debug!(key = %key, "revalidated");
                }
                Ok(None) => {
                    entries.invalidate(&key).await;
                    tracing::info!(key = %key, "content no longer available, evicted");
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "revalidation failed, serving stale");
                }
            }
        });
    }
}

/// Clears a key's in-flight mark when its refresh task ends, even by panic.
struct RefreshGuard {
    refreshing: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.refreshing.lock().remove(&self.key);
    }
}
