use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

/// A read-through memoization cache for derived views. Keys carry the
/// archive version plus the request parameters, so any underlying data
/// change misses naturally. The value is computed outside the lock:
/// two racing callers may compute the same view twice, which is
/// wasteful but correctness-neutral for a pure function.
#[derive(Debug)]
pub struct StatCache<K, V> {
    inner: Mutex<HashMap<K, Arc<V>>>,
}

// Derived Default would bound K and V; an empty map needs neither.
impl<K, V> Default for StatCache<K, V> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone, V> StatCache<K, V> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn get_or_compute<F>(&self, key: K, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = Arc::new(compute());
        let mut guard = self.inner.lock().expect("stat cache lock poisoned");
        guard.entry(key).or_insert(value).clone()
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let guard = self.inner.lock().expect("stat cache lock poisoned");
        guard.get(key).cloned()
    }

    pub fn invalidate_all(&self) {
        let mut guard = self.inner.lock().expect("stat cache lock poisoned");
        guard.clear();
    }

    pub fn len(&self) -> usize {
        let guard = self.inner.lock().expect("stat cache lock poisoned");
        guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
