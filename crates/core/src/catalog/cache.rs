//! Freshness window for catalog responses.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::models::{CatalogItemDetail, Page};

#[derive(Debug)]
struct Entry<T> {
    stored_at: Instant,
    value: T,
}

#[derive(Debug, Default)]
struct Inner {
    token: Option<String>,
    pages: HashMap<(u32, u32), Entry<Page>>,
    details: HashMap<String, Entry<CatalogItemDetail>>,
}

impl Inner {
    // Entries are only valid for the token they were fetched with.
    fn sync_token(&mut self, token: Option<&str>) {
        if self.token.as_deref() != token {
            self.pages.clear();
            self.details.clear();
            self.token = token.map(str::to_string);
        }
    }
}

/// Shared in-memory cache of list pages and detail records.
#[derive(Debug, Clone)]
pub(crate) struct ResponseCache {
    inner: Arc<Mutex<Inner>>,
    list_ttl: Duration,
    detail_ttl: Duration,
}

impl ResponseCache {
    pub(crate) fn new(list_ttl: Duration, detail_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            list_ttl,
            detail_ttl,
        }
    }

    pub(crate) fn page(&self, token: Option<&str>, offset: u32, limit: u32) -> Option<Page> {
        let mut inner = self.inner.lock();
        inner.sync_token(token);
        take_fresh(&mut inner.pages, &(offset, limit), self.list_ttl)
    }

    pub(crate) fn store_page(&self, token: Option<&str>, page: &Page) {
        if self.list_ttl.is_zero() {
            return;
        }
        let mut inner = self.inner.lock();
        inner.sync_token(token);
        let ttl = self.list_ttl;
        inner.pages.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        inner.pages.insert(
            (page.offset, page.limit),
            Entry {
                stored_at: Instant::now(),
                value: page.clone(),
            },
        );
    }

    pub(crate) fn detail(
        &self,
        token: Option<&str>,
        id_or_name: &str,
    ) -> Option<CatalogItemDetail> {
        let mut inner = self.inner.lock();
        inner.sync_token(token);
        take_fresh(&mut inner.details, &detail_key(id_or_name), self.detail_ttl)
    }

    pub(crate) fn store_detail(
        &self,
        token: Option<&str>,
        id_or_name: &str,
        detail: &CatalogItemDetail,
    ) {
        if self.detail_ttl.is_zero() {
            return;
        }
        let mut inner = self.inner.lock();
        inner.sync_token(token);
        let ttl = self.detail_ttl;
        inner.details.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        let now = Instant::now();
        // Reachable by both the requested key and the canonical id.
        for key in [detail_key(id_or_name), detail.id.to_string()] {
            inner.details.insert(
                key,
                Entry {
                    stored_at: now,
                    value: detail.clone(),
                },
            );
        }
    }

    pub(crate) fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.pages.clear();
        inner.details.clear();
    }
}

// Expired entries are dropped on lookup.
fn take_fresh<K, T>(map: &mut HashMap<K, Entry<T>>, key: &K, ttl: Duration) -> Option<T>
where
    K: Eq + Hash,
    T: Clone,
{
    if map.get(key)?.stored_at.elapsed() >= ttl {
        map.remove(key);
        return None;
    }
    map.get(key).map(|entry| entry.value.clone())
}

fn detail_key(id_or_name: &str) -> String {
    id_or_name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItemSummary, Sprites};

    fn page(offset: u32) -> Page {
        Page {
            items: vec![CatalogItemSummary::new("bulbasaur", ".../1/")],
            total_count: 100,
            offset,
            limit: 20,
        }
    }

    fn detail() -> CatalogItemDetail {
        CatalogItemDetail {
            id: 25,
            name: "pikachu".to_string(),
            height: 4,
            weight: 60,
            base_experience: Some(112),
            types: Vec::new(),
            stats: Vec::new(),
            abilities: Vec::new(),
            moves: Vec::new(),
            forms: Vec::new(),
            sprites: Sprites::default(),
        }
    }

    #[test]
    fn pages_are_keyed_by_window() {
        let cache = ResponseCache::new(Duration::from_secs(60), Duration::from_secs(60));
        cache.store_page(Some("t"), &page(0));
        assert_eq!(cache.page(Some("t"), 0, 20), Some(page(0)));
        assert_eq!(cache.page(Some("t"), 20, 20), None);
        assert_eq!(cache.page(Some("t"), 0, 10), None);
    }

    #[test]
    fn token_change_purges_entries() {
        let cache = ResponseCache::new(Duration::from_secs(60), Duration::from_secs(60));
        cache.store_page(Some("old"), &page(0));
        cache.store_detail(Some("old"), "Pikachu", &detail());
        assert_eq!(cache.page(Some("new"), 0, 20), None);
        assert_eq!(cache.page(Some("old"), 0, 20), None);
        assert_eq!(cache.detail(Some("old"), "pikachu"), None);
    }

    #[test]
    fn details_resolve_by_name_and_id() {
        let cache = ResponseCache::new(Duration::from_secs(60), Duration::from_secs(60));
        cache.store_detail(Some("t"), " Pikachu ", &detail());
        assert_eq!(cache.detail(Some("t"), "pikachu").map(|d| d.id), Some(25));
        assert_eq!(cache.detail(Some("t"), "25").map(|d| d.id), Some(25));
    }

    #[test]
    fn zero_window_disables_caching() {
        let cache = ResponseCache::new(Duration::ZERO, Duration::ZERO);
        cache.store_page(Some("t"), &page(0));
        cache.store_detail(Some("t"), "pikachu", &detail());
        assert_eq!(cache.page(Some("t"), 0, 20), None);
        assert_eq!(cache.detail(Some("t"), "pikachu"), None);
    }

    #[test]
    fn expired_entries_are_evicted() {
        let cache = ResponseCache::new(Duration::from_millis(10), Duration::from_millis(10));
        cache.store_page(Some("t"), &page(0));
        cache.store_detail(Some("t"), "pikachu", &detail());
        std::thread::sleep(Duration::from_millis(30));

        assert_eq!(cache.page(Some("t"), 0, 20), None);
        assert_eq!(cache.detail(Some("t"), "pikachu"), None);
        assert!(cache.inner.lock().pages.is_empty());
        // The id key expired too and goes with the next store.
        cache.store_detail(Some("t"), "bulbasaur", &CatalogItemDetail { id: 1, ..detail() });
        let keys: Vec<String> = cache.inner.lock().details.keys().cloned().collect();
        assert_eq!(keys.len(), 2);
        assert!(!keys.contains(&"25".to_string()));
    }

    #[test]
    fn clear_drops_everything() {
        let cache = ResponseCache::new(Duration::from_secs(60), Duration::from_secs(60));
        cache.store_page(None, &page(0));
        cache.clear();
        assert_eq!(cache.page(None, 0, 20), None);
    }
}
