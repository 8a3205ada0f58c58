//! Memoized permission map lookups.
//!
//! The gate resolves the current path on every sync. [`ResolutionCache`]
//! keeps the last few hundred results in an LRU (the [`lru`] crate) so that
//! the longest-prefix scan only runs once per distinct path. It is gated
//! behind the `cache` feature; without it the gate resolves directly.
//!
//! [`CacheStats`] counts hits and misses for diagnostics.
//!
//! # Examples
//!
//! ```
//! use gpui_access_gate::cache::ResolutionCache;
//! use gpui_access_gate::{NavGroup, NavItem, NavigationTree, PermissionMap};
//!
//! let tree = NavigationTree::new()
//!     .group(NavGroup::new("Admin").item(NavItem::new("Teams", "/admin/teams", "teams.view")));
//! let map = PermissionMap::build(&tree).unwrap();
//!
//! let mut cache = ResolutionCache::new();
//! cache.resolve(&map, "/admin/teams/1");
//! cache.resolve(&map, "/admin/teams/1");
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use crate::permissions::{PermissionMap, Resolution};
use crate::trace_log;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Hit/miss counters for a [`ResolutionCache`].
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Lookups that had to consult the map.
    pub misses: usize,
    /// Number of [`ResolutionCache::clear`] calls.
    pub invalidations: usize,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`, or `0.0` before any lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU of `path → Resolution`.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: LruCache<String, Resolution>,
    stats: CacheStats,
}

impl ResolutionCache {
    const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding up to `capacity` paths. Zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Resolve `path` against `map`, consulting the cache first.
    ///
    /// The cache assumes `map` does not change; call [`clear`](Self::clear)
    /// when handing it a different map.
    pub fn resolve(&mut self, map: &PermissionMap, path: &str) -> Resolution {
        if let Some(hit) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Permission cache hit for '{}'", path);
            return hit.clone();
        }

        self.stats.misses += 1;
        trace_log!("Permission cache miss for '{}'", path);
        let resolution = map.resolve(path);
        self.entries.put(path.to_string(), resolution.clone());
        resolution
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.invalidations += 1;
    }

    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}
