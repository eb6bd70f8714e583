//! Value interning.
//!
//! [`ValueCache`] is a caller-owned, direct-mapped table that memoizes the
//! normalization performed by [`Value::create`]. It never changes results:
//! a hit returns exactly the value a miss would have computed, and values
//! compare by their fields either way. Each owner (e.g. each simulation
//! worker) keeps its own cache; there is no global instance.

use crate::error::Result;
use crate::utils::{pairing2, pairing4, MyHash};
use crate::value::Value;

struct Entry<K, V> {
    key: K,
    value: V,
}

/// Direct-mapped cache with `2^bits` slots; a colliding insert evicts.
pub struct Cache<K, V> {
    data: Vec<Option<Entry<K, V>>>,
    bitmask: u64,
    hits: usize,
    misses: usize,
}

impl<K, V> Cache<K, V> {
    /// Create a new table of size `2^bits`.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");

        let size = 1 << bits;
        let bitmask = (size - 1) as u64;

        Self {
            data: std::iter::repeat_with(|| None).take(size).collect(),
            bitmask,
            hits: 0,
            misses: 0,
        }
    }

    /// Get the number of slots.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }
    /// Get the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Reset the cache.
    pub fn clear(&mut self) {
        self.data.fill_with(|| None);
    }

    fn index(&self, hash: u64) -> usize {
        (hash & self.bitmask) as usize
    }
}

impl<K, V> Cache<K, V>
where
    K: MyHash + Eq,
{
    /// Get the cached result.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let index = self.index(key.hash());
        match &self.data[index] {
            Some(entry) if entry.key == *key => {
                self.hits += 1;
                Some(&entry.value)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert a result into the cache.
    pub fn insert(&mut self, key: K, value: V) {
        let index = self.index(key.hash());
        self.data[index] = Some(Entry { key, value });
    }
}

/// Raw, not yet normalized, arguments of [`Value::create`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RawValue {
    pub width: usize,
    pub error: u32,
    pub unknown: u32,
    pub value: u32,
}

impl MyHash for RawValue {
    fn hash(&self) -> u64 {
        let h = pairing4(self.width as u64, self.error as u64, self.unknown as u64, self.value as u64);
        // Fold the high half in, so that the slot index sees every field.
        pairing2(h >> 32, h & 0xFFFF_FFFF)
    }
}

/// Interning front-end for [`Value::create`].
pub struct ValueCache {
    cache: Cache<RawValue, Value>,
}

impl Default for ValueCache {
    fn default() -> Self {
        Self::new(12)
    }
}

impl ValueCache {
    /// Create a cache with `2^bits` slots.
    pub fn new(bits: usize) -> Self {
        Self { cache: Cache::new(bits) }
    }

    /// Same as [`Value::create`], served from the table when possible.
    pub fn create(&mut self, width: usize, error: u32, unknown: u32, value: u32) -> Result<Value> {
        // Canonical one-bit and zero-bit values are constants already.
        if width <= 1 {
            return Value::create(width, error, unknown, value);
        }
        let key = RawValue {
            width,
            error,
            unknown,
            value,
        };
        if let Some(&cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        let created = Value::create(width, error, unknown, value)?;
        self.cache.insert(key, created);
        Ok(created)
    }

    pub fn hits(&self) -> usize {
        self.cache.hits()
    }

    pub fn misses(&self) -> usize {
        self.cache.misses()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    impl MyHash for u64 {
        fn hash(&self) -> u64 {
            *self
        }
    }

    #[test]
    fn test_cache() {
        let mut cache = Cache::<(u64, u64), i32>::new(3);

        cache.insert((1, 2), 3);
        cache.insert((2, 3), 1);
        cache.insert((1, 3), 2);

        assert_eq!(cache.get(&(1, 2)), Some(&3));
        assert_eq!(cache.get(&(2, 3)), Some(&1));
        assert_eq!(cache.get(&(1, 3)), Some(&2));
        assert_eq!(cache.get(&(2, 1)), None);
        assert_eq!(cache.get(&(3, 3)), None);
    }

    #[test]
    fn test_collision_evicts() {
        let mut cache = Cache::<u64, &str>::new(2);
        cache.insert(1, "one");
        cache.insert(5, "five");
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&5), Some(&"five"));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_value_cache_agrees_with_create() {
        let mut cache = ValueCache::new(4);
        for width in 0..=8 {
            for raw in [0u32, 0x0F, 0xA5, 0xFF] {
                let expected = Value::create(width, raw >> 4, raw & 0x3, raw).unwrap();
                assert_eq!(cache.create(width, raw >> 4, raw & 0x3, raw).unwrap(), expected);
                assert_eq!(cache.create(width, raw >> 4, raw & 0x3, raw).unwrap(), expected);
            }
        }
        assert!(cache.hits() > 0);
    }

    #[test]
    fn test_value_cache_hit_after_clear_is_miss() {
        let mut cache = ValueCache::default();
        let a = cache.create(8, 0, 0, 0x42).unwrap();
        assert_eq!(cache.misses(), 1);
        let b = cache.create(8, 0, 0, 0x42).unwrap();
        assert_eq!(cache.hits(), 1);
        assert_eq!(a, b);

        cache.clear();
        let c = cache.create(8, 0, 0, 0x42).unwrap();
        assert_eq!(cache.misses(), 2);
        assert_eq!(c, a);
    }

    #[test]
    fn test_value_cache_rejects_wide() {
        let mut cache = ValueCache::default();
        assert!(cache.create(33, 0, 0, 0).is_err());
    }
}
