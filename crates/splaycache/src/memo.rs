//! Memo: a memoization table over an interchangeable cache backend
//!
//! The memo is owned by the caller and passed explicitly into the
//! computation it speeds up. There is no global table.

use std::hash::Hash;

use crate::lru::LruCache;
use crate::splay::SplayTree;
use crate::stats::CacheStats;

/// Key/value store usable as a memo table
pub trait MemoCache {
    /// Lookup key
    type Key;
    /// Stored value
    type Value: Clone;

    /// Short backend name for reports
    fn name(&self) -> &'static str;

    /// Find a value. Backends may reorganize themselves on lookup.
    fn lookup(&mut self, key: &Self::Key) -> Option<Self::Value>;

    /// Store a value, returning any entry evicted to make room
    fn store(&mut self, key: Self::Key, value: Self::Value) -> Option<(Self::Key, Self::Value)>;

    /// Number of stored entries
    fn len(&self) -> usize;

    /// Check if nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    fn clear(&mut self);
}

impl<K: Ord, V: Clone> MemoCache for SplayTree<K, V> {
    type Key = K;
    type Value = V;

    fn name(&self) -> &'static str {
        "splay"
    }

    fn lookup(&mut self, key: &K) -> Option<V> {
        self.find(key).cloned()
    }

    fn store(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.insert(key, value);
        None
    }

    fn len(&self) -> usize {
        SplayTree::len(self)
    }

    fn clear(&mut self) {
        SplayTree::clear(self);
    }
}

impl<K: Hash + Eq + Clone, V: Clone> MemoCache for LruCache<K, V> {
    type Key = K;
    type Value = V;

    fn name(&self) -> &'static str {
        "lru"
    }

    fn lookup(&mut self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn store(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.put(key, value)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn clear(&mut self) {
        LruCache::clear(self);
    }
}

/// Memo table combining a cache backend with hit/miss statistics
pub struct Memo<C> {
    /// Backend holding computed values
    cache: C,

    /// Lookup statistics
    stats: CacheStats,
}

impl<C: MemoCache> Memo<C> {
    /// Wrap a cache backend
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            stats: CacheStats::new(),
        }
    }

    /// Look up a memoized value
    pub fn get(&mut self, key: &C::Key) -> Option<C::Value> {
        let value = self.cache.lookup(key);
        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    /// Store a computed value, returning any evicted entry
    pub fn put(&mut self, key: C::Key, value: C::Value) -> Option<(C::Key, C::Value)> {
        self.stats.record_insert();
        let evicted = self.cache.store(key, value);
        if evicted.is_some() {
            self.stats.record_eviction();
        }
        evicted
    }

    /// Return the memoized value for `key`, computing and storing it on a miss.
    ///
    /// `compute` receives the memo itself so recursive computations can
    /// consult it for their subproblems.
    pub fn get_or_insert_with<F>(&mut self, key: C::Key, compute: F) -> C::Value
    where
        F: FnOnce(&mut Self) -> C::Value,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }

        let value = compute(self);
        self.put(key, value.clone());
        value
    }

    /// Empty the table after the underlying data changed. Statistics are kept.
    pub fn invalidate(&mut self) {
        self.cache.clear();
        self.stats.record_invalidation();
    }

    /// Empty the table and reset statistics
    pub fn clear(&mut self) {
        self.cache.clear();
        self.stats.reset();
    }

    /// Number of memoized entries
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if nothing is memoized
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Backend name
    pub fn name(&self) -> &'static str {
        self.cache.name()
    }

    /// Get lookup statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Borrow the backend
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Unwrap the backend
    pub fn into_inner(self) -> C {
        self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fib<C: MemoCache<Key = u32, Value = u64>>(n: u32, memo: &mut Memo<C>) -> u64 {
        if n <= 1 {
            return n as u64;
        }
        memo.get_or_insert_with(n, |m| fib(n - 1, m) + fib(n - 2, m))
    }

    #[test]
    fn test_memo_hit_miss() {
        let mut memo = Memo::new(SplayTree::new());

        assert_eq!(memo.get(&1), None::<&str>);
        memo.put(1, "one");
        assert_eq!(memo.get(&1), Some("one"));

        assert_eq!(memo.stats().hits(), 1);
        assert_eq!(memo.stats().misses(), 1);
        assert_eq!(memo.stats().inserts(), 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_memo_records_evictions() {
        let mut memo = Memo::new(LruCache::new(2));

        memo.put(1, 10);
        memo.put(2, 20);
        assert_eq!(memo.put(3, 30), Some((1, 10)));

        assert_eq!(memo.stats().evictions(), 1);
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn test_memo_fibonacci_backends_agree() {
        let mut splay = Memo::new(SplayTree::new());
        let mut lru = Memo::new(LruCache::unbounded());

        assert_eq!(fib(90, &mut splay), 2_880_067_194_370_816_120);
        assert_eq!(fib(90, &mut lru), 2_880_067_194_370_816_120);

        // Every n in 2..=90 computed once
        assert_eq!(splay.len(), 89);
        assert_eq!(lru.len(), 89);
        assert_eq!(splay.stats().misses(), lru.stats().misses());
    }

    #[test]
    fn test_memo_warm_lookup_is_hit() {
        let mut memo = Memo::new(SplayTree::new());
        fib(30, &mut memo);
        let before = *memo.stats();

        assert_eq!(fib(30, &mut memo), 832_040);
        assert_eq!(memo.stats().hits(), before.hits() + 1);
        assert_eq!(memo.stats().misses(), before.misses());
        assert_eq!(memo.cache().root_key(), Some(&30));
    }

    #[test]
    fn test_memo_invalidate_keeps_stats() {
        let mut memo = Memo::new(LruCache::new(8));
        memo.get_or_insert_with((0usize, 3usize), |_| 6u64);
        memo.invalidate();

        assert!(memo.is_empty());
        assert_eq!(memo.stats().misses(), 1);
        assert_eq!(memo.stats().invalidations(), 1);

        memo.clear();
        assert_eq!(*memo.stats(), CacheStats::default());
    }

    #[test]
    fn test_memo_names() {
        assert_eq!(Memo::new(SplayTree::<u8, u8>::new()).name(), "splay");
        assert_eq!(Memo::new(LruCache::<u8, u8>::new(1)).name(), "lru");
        let tree = Memo::new(SplayTree::<u8, u8>::new()).into_inner();
        assert!(tree.is_empty());
    }
}
