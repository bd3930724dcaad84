use crate::models::Category;
use moka::future::{Cache, CacheBuilder};
use serde::Serialize;
use std::time::Duration;

/// Per-category cache for aggregation results
///
/// Aggregations scan every record matching a category, and there are only
/// four categories, so results are kept in memory for a short TTL. A TTL of
/// zero disables caching.
#[derive(Clone)]
pub struct CategoryCache<V: Clone + Send + Sync + 'static> {
    inner: Option<Cache<Category, V>>,
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub entry_count: u64,
}

impl<V: Clone + Send + Sync + 'static> CategoryCache<V> {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let inner = (ttl_secs > 0).then(|| {
            CacheBuilder::new(max_entries)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build()
        });

        Self { inner }
    }

    pub async fn get(&self, category: Category) -> Option<V> {
        let value = self.inner.as_ref()?.get(&category).await;
        if value.is_some() {
            tracing::trace!("Aggregate cache hit: {}", category);
        }
        value
    }

    pub async fn insert(&self, category: Category, value: V) {
        if let Some(cache) = &self.inner {
            cache.insert(category, value).await;
        }
    }

    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.inner.is_some(),
            entry_count: self.inner.as_ref().map_or(0, |c| c.entry_count()),
        }
    }
}
