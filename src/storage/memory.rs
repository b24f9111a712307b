//! In-memory TTL result store

use crate::config::CacheConfig;
use crate::orchestrator::AnalysisResult;
use crate::storage::traits::{ResultStore, StoreError, StoreResult};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

struct Entry {
    result: Arc<AnalysisResult>,
    inserted_at: Instant,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<Uuid, Entry>,
    /// Insertion order, oldest first
    order: VecDeque<Uuid>,
}

impl Inner {
    fn evict(&mut self, ttl: Duration, max_entries: usize, now: Instant) {
        while let Some(id) = self.order.front().copied() {
            let expired = self
                .entries
                .get(&id)
                .map_or(true, |entry| now.duration_since(entry.inserted_at) >= ttl);

            if !expired && self.entries.len() <= max_entries {
                break;
            }

            self.order.pop_front();
            if self.entries.remove(&id).is_some() {
                debug!("Evicted analysis {}", id);
            }
        }
    }
}

/// Mutex-guarded map with TTL and max-entries eviction
pub struct MemoryResultStore {
    inner: Mutex<Inner>,
    ttl: Duration,
    max_entries: usize,
}

impl MemoryResultStore {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.max_entries)
    }

    /// Locks the map and drops whatever has expired
    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.evict(self.ttl, self.max_entries, Instant::now());
        Ok(inner)
    }
}

impl std::fmt::Debug for MemoryResultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryResultStore")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

impl ResultStore for MemoryResultStore {
    fn insert(&self, result: AnalysisResult) -> StoreResult<Arc<AnalysisResult>> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        let id = result.analysis_id;
        let result = Arc::new(result);

        inner.entries.insert(
            id,
            Entry {
                result: Arc::clone(&result),
                inserted_at: Instant::now(),
            },
        );
        inner.order.push_back(id);
        inner.evict(self.ttl, self.max_entries, Instant::now());

        Ok(result)
    }

    fn get(&self, id: Uuid) -> StoreResult<Arc<AnalysisResult>> {
        self.lock()?
            .entries
            .get(&id)
            .map(|entry| Arc::clone(&entry.result))
            .ok_or(StoreError::NotFound(id))
    }

    fn latest_for_url(&self, url: &str) -> StoreResult<Arc<AnalysisResult>> {
        let inner = self.lock()?;
        inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.entries.get(id))
            .find(|entry| {
                entry.result.url == url || entry.result.final_url.as_deref() == Some(url)
            })
            .map(|entry| Arc::clone(&entry.result))
            .ok_or_else(|| StoreError::NoResultForUrl(url.to_string()))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{
        AiInsight, AiRecommendations, DomainTrustResult, PageSpeedResult, SeoResult, UxResult,
    };
    use crate::orchestrator::{Failures, Language};
    use chrono::Utc;
    use url::Url;

    fn result_for(url: &str) -> AnalysisResult {
        let parsed = Url::parse(url).unwrap();
        AnalysisResult {
            analysis_id: Uuid::new_v4(),
            url: url.to_string(),
            final_url: Some(url.to_string()),
            language: Language::En,
            analyzed_at: Utc::now(),
            status_code: Some(200),
            fetch_error: None,
            seo: SeoResult::default(),
            ux: UxResult::default(),
            domain_trust: DomainTrustResult::unknown("example.com", "test"),
            page_speed: PageSpeedResult::unavailable(&parsed, "test"),
            ai_insight: AiInsight::unavailable("test"),
            ai_recommendations: AiRecommendations::unavailable("test"),
            failures: Failures::default(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = MemoryResultStore::new(Duration::from_secs(60), 10);
        let stored = store.insert(result_for("https://example.com/")).unwrap();

        let fetched = store.get(stored.analysis_id).unwrap();
        assert_eq!(fetched.url, "https://example.com/");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_get_unknown_id() {
        let store = MemoryResultStore::new(Duration::from_secs(60), 10);
        let id = Uuid::new_v4();
        assert_eq!(store.get(id).unwrap_err(), StoreError::NotFound(id));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_latest_for_url_prefers_newest() {
        let store = MemoryResultStore::new(Duration::from_secs(60), 10);
        store.insert(result_for("https://a.com/")).unwrap();
        let second = store.insert(result_for("https://a.com/")).unwrap();
        store.insert(result_for("https://b.com/")).unwrap();

        let found = store.latest_for_url("https://a.com/").unwrap();
        assert_eq!(found.analysis_id, second.analysis_id);
        assert!(matches!(
            store.latest_for_url("https://c.com/"),
            Err(StoreError::NoResultForUrl(_))
        ));
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let store = MemoryResultStore::new(Duration::from_millis(50), 10);
        let stored = store.insert(result_for("https://example.com/")).unwrap();

        std::thread::sleep(Duration::from_millis(80));

        assert_eq!(
            store.get(stored.analysis_id).unwrap_err(),
            StoreError::NotFound(stored.analysis_id)
        );
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_max_entries_evicts_oldest() {
        let store = MemoryResultStore::new(Duration::from_secs(60), 2);
        let first = store.insert(result_for("https://a.com/")).unwrap();
        store.insert(result_for("https://b.com/")).unwrap();
        store.insert(result_for("https://c.com/")).unwrap();

        assert_eq!(store.len().unwrap(), 2);
        assert!(store.get(first.analysis_id).is_err());
    }
}
