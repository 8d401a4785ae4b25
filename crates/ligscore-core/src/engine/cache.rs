use std::collections::HashMap;
use std::hash::Hash;

/// Write-once memo table.
///
/// A value is computed at most once per key. Failed computations store nothing, so a later
/// call retries them.
#[derive(Debug, Clone)]
pub struct MemoCache<K, V> {
    data: HashMap<K, V>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> MemoCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.data.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn get_or_try_insert_with<E, F>(&mut self, key: K, compute: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        use std::collections::hash_map::Entry;
        match self.data.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(compute()?)),
        }
    }
}
