//! Per-process role cache: an LRU keyed by role name with per-entry TTL.
//!
//! Readers mutate the cache (misses insert after a DB fetch), so every
//! operation takes the internal lock. There is no single-flight dedup of
//! concurrent misses; a duplicate fetch for the same role is harmless.

use std::{
    num::NonZeroUsize,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use authz_types::role::Role;
use lru::LruCache;
use parking_lot::Mutex;

use crate::config::CacheConfig;

struct CacheEntry {
    role: Role,
    expires_at: Instant,
}

pub struct RoleCache {
    enabled: bool,
    ttl: Duration,
    entries: Mutex<LruCache<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RoleCache {
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_size.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            enabled: config.enabled,
            ttl: config.ttl,
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Split `names` into cached roles and missing names. Expired entries
    /// count as misses and are evicted on the spot. A disabled cache misses
    /// everything.
    #[must_use]
    pub fn get(&self, names: &[String]) -> (Vec<Role>, Vec<String>) {
        if !self.enabled {
            self.misses.fetch_add(names.len() as u64, Ordering::Relaxed);
            return (Vec::new(), names.to_vec());
        }

        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        let now = Instant::now();

        let mut entries = self.entries.lock();
        for name in names {
            match entries.get(name) {
                Some(entry) if entry.expires_at > now => found.push(entry.role.clone()),
                Some(_) => {
                    entries.pop(name);
                    missing.push(name.clone());
                }
                None => missing.push(name.clone()),
            }
        }
        drop(entries);

        self.hits.fetch_add(found.len() as u64, Ordering::Relaxed);
        self.misses
            .fetch_add(missing.len() as u64, Ordering::Relaxed);
        (found, missing)
    }

    /// Insert or refresh each role under its own name.
    pub fn set(&self, roles: &[Role]) {
        if !self.enabled {
            return;
        }
        let expires_at = Instant::now() + self.ttl;
        let mut entries = self.entries.lock();
        for role in roles {
            entries.put(
                role.name.clone(),
                CacheEntry {
                    role: role.clone(),
                    expires_at,
                },
            );
        }
    }

    pub fn remove(&self, name: &str) {
        self.entries.lock().pop(name);
    }

    /// Names currently cached, most recently used first.
    #[must_use]
    pub fn cached_names(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry, returning how many were evicted.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock();
        let cleared = entries.len();
        entries.clear();
        cleared
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str) -> Role {
        Role {
            name: name.to_string(),
            description: String::new(),
            policies: vec![],
            immutable: false,
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn config(enabled: bool, ttl: Duration, max_size: usize) -> CacheConfig {
        CacheConfig {
            enabled,
            ttl,
            max_size,
        }
    }

    #[test]
    fn get_after_set_hits_until_cleared() {
        let cache = RoleCache::new(&config(true, Duration::from_secs(60), 8));

        let (found, missing) = cache.get(&names(&["a", "b"]));
        assert!(found.is_empty());
        assert_eq!(missing, names(&["a", "b"]));

        cache.set(&[role("a"), role("b")]);
        let (found, missing) = cache.get(&names(&["a", "b"]));
        assert_eq!(found.len(), 2);
        assert!(missing.is_empty());
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 2);

        assert_eq!(cache.clear(), 2);
        let (found, missing) = cache.get(&names(&["a", "b"]));
        assert!(found.is_empty());
        assert_eq!(missing, names(&["a", "b"]));
    }

    #[test]
    fn partial_hits_split_found_and_missing() {
        let cache = RoleCache::new(&config(true, Duration::from_secs(60), 8));
        cache.set(&[role("a")]);

        let (found, missing) = cache.get(&names(&["a", "ghost"]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "a");
        assert_eq!(missing, names(&["ghost"]));
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = RoleCache::new(&config(true, Duration::ZERO, 8));
        cache.set(&[role("a")]);

        let (found, missing) = cache.get(&names(&["a"]));
        assert!(found.is_empty());
        assert_eq!(missing, names(&["a"]));
        assert!(cache.is_empty());
    }

    #[test]
    fn lru_evicts_the_oldest_entry() {
        let cache = RoleCache::new(&config(true, Duration::from_secs(60), 2));
        cache.set(&[role("a"), role("b")]);
        // Touch `a` so `b` becomes the eviction candidate.
        let _ = cache.get(&names(&["a"]));
        cache.set(&[role("c")]);

        assert_eq!(cache.len(), 2);
        let (found, missing) = cache.get(&names(&["a", "b", "c"]));
        assert_eq!(found.len(), 2);
        assert_eq!(missing, names(&["b"]));
    }

    #[test]
    fn disabled_cache_always_misses() {
        let cache = RoleCache::new(&config(false, Duration::from_secs(60), 8));
        cache.set(&[role("a")]);

        let (found, missing) = cache.get(&names(&["a"]));
        assert!(found.is_empty());
        assert_eq!(missing, names(&["a"]));
        assert_eq!(cache.len(), 0);
    }
}
