//! Protected-term cache keyed by exact document text

use crate::anonymization::models::ProtectedTermSet;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Default cache budget: 64 MiB of keys plus terms
pub const DEFAULT_MAX_BYTES: u64 = 64 * 1024 * 1024;

/// Concurrency-safe, size-bounded map from text to its protected terms
///
/// Cheap to clone; clones share the same storage. Concurrent misses on the
/// same key are coalesced so the tagger runs once per key.
#[derive(Clone)]
pub struct TermCache {
    inner: Cache<String, Arc<ProtectedTermSet>>,
}

impl TermCache {
    /// Create a cache bounded by the combined byte size of keys and terms
    pub fn new(max_bytes: u64, time_to_idle: Option<Duration>) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(max_bytes)
            .weigher(|text: &String, terms: &Arc<ProtectedTermSet>| -> u32 {
                (text.len() + terms.byte_size())
                    .try_into()
                    .unwrap_or(u32::MAX)
            });
        if let Some(idle) = time_to_idle {
            builder = builder.time_to_idle(idle);
        }

        Self {
            inner: builder.build(),
        }
    }

    /// Cached terms for `text`, if present
    pub fn get(&self, text: &str) -> Option<Arc<ProtectedTermSet>> {
        self.inner.get(text)
    }

    /// Return the cached value or compute, store and return it
    ///
    /// A failed computation is not cached.
    pub fn get_or_try_compute<F, E>(&self, text: &str, compute: F) -> Result<Arc<ProtectedTermSet>, Arc<E>>
    where
        F: FnOnce() -> Result<ProtectedTermSet, E>,
        E: Send + Sync + 'static,
    {
        self.inner
            .try_get_with(text.to_string(), || compute().map(Arc::new))
    }

    pub fn contains(&self, text: &str) -> bool {
        self.inner.contains_key(text)
    }

    /// Approximate number of entries
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Apply pending evictions and bookkeeping
    pub fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks();
    }
}

impl Default for TermCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BYTES, None)
    }
}

impl std::fmt::Debug for TermCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermCache")
            .field("entry_count", &self.inner.entry_count())
            .field("weighted_size", &self.inner.weighted_size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn terms(values: &[&str]) -> ProtectedTermSet {
        values.iter().copied().collect()
    }

    #[test]
    fn test_computes_once_per_text() {
        let cache = TermCache::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_try_compute("Warfarin 5mg", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(terms(&["Warfarin"]))
                })
                .unwrap();
            assert!(value.contains("Warfarin"));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains("Warfarin 5mg"));
    }

    #[test]
    fn test_failure_is_not_cached() {
        let cache = TermCache::default();
        let failed = cache.get_or_try_compute("text", || Err::<ProtectedTermSet, _>("boom".to_string()));
        assert!(failed.is_err());
        assert!(cache.get("text").is_none());

        let ok = cache
            .get_or_try_compute("text", || Ok::<_, String>(terms(&["asthma"])))
            .unwrap();
        assert_eq!(ok.len(), 1);
    }

    #[test]
    fn test_size_bound_evicts() {
        let cache = TermCache::new(64, None);
        for i in 0..50 {
            let text = format!("document number {i:04} with some padding text");
            cache
                .get_or_try_compute(&text, || Ok::<_, String>(ProtectedTermSet::new()))
                .unwrap();
        }
        cache.run_pending_tasks();
        assert!(cache.entry_count() <= 2);
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = TermCache::default();
        let clone = cache.clone();
        cache
            .get_or_try_compute("shared", || Ok::<_, String>(terms(&["x"])))
            .unwrap();
        assert!(clone.get("shared").is_some());
    }
}
