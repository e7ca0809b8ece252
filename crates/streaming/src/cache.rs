use std::collections::BTreeMap;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CacheCapacity {
    pub max_entries: usize,
}

impl CacheCapacity {
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    last_used_tick: u64,
}

/// Capacity-bounded LRU map keyed by media URL.
///
/// Notes:
/// - Entries live in a `BTreeMap` for stable traversal order.
/// - Every insert and every touch takes a fresh tick, so eviction order
///   reflects recency of use rather than insertion order. Ties (impossible in
///   practice) break by key ordering.
/// - The cache never disposes anything itself: evicted values are handed back
///   to the caller, which owns their native resources.
#[derive(Debug)]
pub struct LruCache<V> {
    capacity: CacheCapacity,
    tick: u64,
    entries: BTreeMap<String, CacheEntry<V>>,
}

impl<V> LruCache<V> {
    pub fn new(capacity: CacheCapacity) -> Self {
        Self {
            capacity,
            tick: 0,
            entries: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> CacheCapacity {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Read without affecting recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn peek_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key).map(|e| &mut e.value)
    }

    /// Mark `key` as most recently used. Returns `false` for unknown keys.
    pub fn touch(&mut self, key: &str) -> bool {
        self.tick += 1;
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used_tick = self.tick;
                true
            }
            None => false,
        }
    }

    /// Read and mark as most recently used.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.tick += 1;
        let tick = self.tick;
        self.entries.get_mut(key).map(|e| {
            e.last_used_tick = tick;
            &mut e.value
        })
    }

    /// Insert (or replace) `key` as the most recently used entry, then evict
    /// least-recently-used entries until the capacity holds again.
    ///
    /// The inserted key is only evicted when the capacity is zero.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Vec<(String, V)> {
        self.tick += 1;
        let key = key.into();
        self.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                last_used_tick: self.tick,
            },
        );
        self.evict_as_needed(Some(&key))
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// Removes everything, returning the values for disposal.
    pub fn drain(&mut self) -> Vec<(String, V)> {
        std::mem::take(&mut self.entries)
            .into_iter()
            .map(|(k, e)| (k, e.value))
            .collect()
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<&str> {
        let mut keys: Vec<(&String, u64)> = self
            .entries
            .iter()
            .map(|(k, e)| (k, e.last_used_tick))
            .collect();
        keys.sort_by(|(ka, ta), (kb, tb)| ta.cmp(tb).then_with(|| ka.cmp(kb)));
        keys.into_iter().map(|(k, _)| k.as_str()).collect()
    }

    fn evict_as_needed(&mut self, protected: Option<&str>) -> Vec<(String, V)> {
        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity.max_entries {
            let pick = |exclude: Option<&str>| {
                self.entries
                    .iter()
                    .filter(|(k, _)| exclude.map(|p| p != k.as_str()).unwrap_or(true))
                    .min_by(|(ka, ea), (kb, eb)| {
                        ea.last_used_tick
                            .cmp(&eb.last_used_tick)
                            .then_with(|| ka.cmp(kb))
                    })
                    .map(|(k, _)| k.clone())
            };

            let Some(key) = pick(protected).or_else(|| pick(None)) else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                evicted.push((key, entry.value));
            }
        }
        evicted
    }
}
