//! Theme lookup and the per-process theme cache
//!
//! The cache is an explicit object handed to each resolution context rather
//! than a hidden global, so tests can isolate state. Entries are only removed
//! by [`ThemeCache::invalidate`] or [`ThemeCache::clear`]; whatever writes a
//! theme must call one of them.

use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{Result, ThemeError};
use crate::record::{ThemeId, ThemeRecord};

/// Where theme rows come from (the theme persistence layer)
pub trait ThemeSource: Send + Sync {
    fn fetch_theme(&self, id: ThemeId) -> Option<ThemeRecord>;
}

/// Theme source backed by a map, for tooling and tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryThemes {
    themes: FxHashMap<ThemeId, ThemeRecord>,
}

impl InMemoryThemes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, theme: ThemeRecord) {
        self.themes.insert(theme.id, theme);
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl FromIterator<ThemeRecord> for InMemoryThemes {
    fn from_iter<T: IntoIterator<Item = ThemeRecord>>(iter: T) -> Self {
        let mut themes = Self::new();
        for theme in iter {
            themes.insert(theme);
        }
        themes
    }
}

impl ThemeSource for InMemoryThemes {
    fn fetch_theme(&self, id: ThemeId) -> Option<ThemeRecord> {
        self.themes.get(&id).cloned()
    }
}

/// Concurrent-read cache of theme rows keyed by id.
#[derive(Debug, Default)]
pub struct ThemeCache {
    entries: RwLock<FxHashMap<ThemeId, Arc<ThemeRecord>>>,
}

impl ThemeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached theme, without fetching.
    pub fn get(&self, id: ThemeId) -> Option<Arc<ThemeRecord>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Cached theme, fetching from `source` on a miss.
    ///
    /// Themes that do not exist are not cached.
    pub fn get_or_fetch(&self, id: ThemeId, source: &dyn ThemeSource) -> Option<Arc<ThemeRecord>> {
        if let Some(theme) = self.get(id) {
            debug!(theme_id = %id, "theme cache hit");
            return Some(theme);
        }
        debug!(theme_id = %id, "theme cache miss");
        let fetched = Arc::new(source.fetch_theme(id)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Another reader may have filled the slot while we fetched.
        Some(entries.entry(id).or_insert(fetched).clone())
    }

    /// Like [`get_or_fetch`](Self::get_or_fetch), but a missing theme is an error.
    pub fn require(&self, id: ThemeId, source: &dyn ThemeSource) -> Result<Arc<ThemeRecord>> {
        self.get_or_fetch(id, source)
            .ok_or(ThemeError::ThemeNotFound(id))
    }

    /// Drop one theme; returns whether it was cached.
    pub fn invalidate(&self, id: ThemeId) -> bool {
        let removed = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            debug!(theme_id = %id, "theme cache entry invalidated");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        inner: InMemoryThemes,
        fetches: AtomicUsize,
    }

    impl ThemeSource for CountingSource {
        fn fetch_theme(&self, id: ThemeId) -> Option<ThemeRecord> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_theme(id)
        }
    }

    fn source() -> CountingSource {
        CountingSource {
            inner: [ThemeRecord::new(1, "Midnight")].into_iter().collect(),
            fetches: AtomicUsize::new(0),
        }
    }

    #[test]
    fn repeated_lookups_fetch_once() {
        let source = source();
        let cache = ThemeCache::new();
        for _ in 0..3 {
            assert_eq!(cache.get_or_fetch(ThemeId(1), &source).unwrap().name, "Midnight");
        }
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let source = source();
        let cache = ThemeCache::new();
        cache.get_or_fetch(ThemeId(1), &source);
        assert!(cache.invalidate(ThemeId(1)));
        assert!(!cache.invalidate(ThemeId(1)));
        cache.get_or_fetch(ThemeId(1), &source);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_theme_is_not_cached() {
        let source = source();
        let cache = ThemeCache::new();
        assert!(cache.get_or_fetch(ThemeId(9), &source).is_none());
        assert!(cache.is_empty());
        assert_eq!(
            cache.require(ThemeId(9), &source).unwrap_err(),
            ThemeError::ThemeNotFound(ThemeId(9))
        );
    }

    #[test]
    fn concurrent_reads_share_entries() {
        let source = source();
        let cache = ThemeCache::new();
        cache.get_or_fetch(ThemeId(1), &source);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| assert!(cache.get(ThemeId(1)).is_some()));
            }
        });
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }
}
