use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Cached value with the time it was fetched
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    fn is_stale(&self, stale_time: Duration) -> bool {
        self.fetched_at.elapsed() >= stale_time
    }
}

/// Per-key state. `generation` only ever grows; every invalidation bumps it.
#[derive(Debug)]
struct Slot<V> {
    entry: Option<CacheEntry<V>>,
    generation: u64,
}

impl<V> Slot<V> {
    fn empty() -> Self {
        Self {
            entry: None,
            generation: 0,
        }
    }
}

/// Thread-safe store behind the query client.
///
/// Entries are fresh for `stale_time`. A writer that read `generation(key)`
/// before fetching can only store its result if no invalidation happened in
/// between (`store_if_current`).
#[derive(Debug)]
pub struct QueryCache<K, V> {
    slots: Arc<RwLock<HashMap<K, Slot<V>>>>,
    stale_time: Duration,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
            stale_time: self.stale_time,
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(stale_time: Duration) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            stale_time,
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Fresh value for `key`, if any
    pub fn get(&self, key: &K) -> Option<V> {
        let slots = self.slots.read().ok()?;
        slots
            .get(key)?
            .entry
            .as_ref()
            .filter(|entry| !entry.is_stale(self.stale_time))
            .map(|entry| entry.value.clone())
    }

    /// Value that is fresh or was fetched at or after `since`.
    pub fn get_since(&self, key: &K, since: Instant) -> Option<V> {
        let slots = self.slots.read().ok()?;
        slots
            .get(key)?
            .entry
            .as_ref()
            .filter(|entry| entry.fetched_at >= since || !entry.is_stale(self.stale_time))
            .map(|entry| entry.value.clone())
    }

    /// Cached value regardless of staleness
    pub fn peek(&self, key: &K) -> Option<V> {
        let slots = self.slots.read().ok()?;
        slots.get(key)?.entry.as_ref().map(|entry| entry.value.clone())
    }

    pub fn generation(&self, key: &K) -> u64 {
        self.slots
            .read()
            .ok()
            .and_then(|slots| slots.get(key).map(|slot| slot.generation))
            .unwrap_or(0)
    }

    /// Store `value` only if `key` has not been invalidated since `generation`.
    pub fn store_if_current(&self, key: K, value: V, generation: u64) -> bool {
        let Ok(mut slots) = self.slots.write() else {
            return false;
        };
        let slot = slots.entry(key).or_insert_with(Slot::empty);
        if slot.generation != generation {
            return false;
        }
        slot.entry = Some(CacheEntry::new(value));
        true
    }

    /// Store `value` unconditionally
    pub fn set(&self, key: K, value: V) {
        if let Ok(mut slots) = self.slots.write() {
            slots.entry(key).or_insert_with(Slot::empty).entry = Some(CacheEntry::new(value));
        }
    }

    /// Drop the value for `key` and bump its generation
    pub fn invalidate(&self, key: &K) {
        if let Ok(mut slots) = self.slots.write() {
            let slot = slots.entry(key.clone()).or_insert_with(Slot::empty);
            slot.generation = slot.generation.wrapping_add(1);
            slot.entry = None;
        }
    }

    /// Invalidate every key
    pub fn clear(&self) {
        if let Ok(mut slots) = self.slots.write() {
            for slot in slots.values_mut() {
                slot.generation = slot.generation.wrapping_add(1);
                slot.entry = None;
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        if let Ok(slots) = self.slots.read() {
            let entries = slots.values().filter_map(|slot| slot.entry.as_ref());
            let (fresh, stale) = entries.fold((0, 0), |(fresh, stale), entry| {
                if entry.is_stale(self.stale_time) {
                    (fresh, stale + 1)
                } else {
                    (fresh + 1, stale)
                }
            });

            CacheStats {
                total_entries: fresh + stale,
                fresh_entries: fresh,
                stale_entries: stale,
            }
        } else {
            CacheStats::default()
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub stale_entries: usize,
}
