//! First-occurrence label index.

use std::hash::Hash;

use hashbrown::HashMap;

/// Assigns each distinct key a dense index in order of first appearance.
///
/// Labels are pairwise distinct; `labels()[i]` is the key with index `i`.
#[derive(Debug, Clone)]
pub struct LabelIndex<K> {
    labels: Vec<K>,
    positions: HashMap<K, usize>,
}

impl<K> Default for LabelIndex<K> {
    fn default() -> Self {
        Self { labels: Vec::new(), positions: HashMap::new() }
    }
}

impl<K: Hash + Eq + Clone> LabelIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `key`, assigning the next free one if it is new.
    pub fn intern(&mut self, key: K) -> usize {
        if let Some(&idx) = self.positions.get(&key) {
            return idx;
        }
        let idx = self.labels.len();
        self.positions.insert(key.clone(), idx);
        self.labels.push(key);
        idx
    }

    pub fn get(&self, key: &K) -> Option<usize> {
        self.positions.get(key).copied()
    }
}

impl<K> LabelIndex<K> {
    pub fn label(&self, idx: usize) -> &K {
        &self.labels[idx]
    }

    pub fn labels(&self) -> &[K] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for LabelIndex<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut index = Self::new();
        for key in iter {
            index.intern(key);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_order() {
        let index: LabelIndex<&str> = ["b", "a", "b", "c", "a"].into_iter().collect();
        assert_eq!(index.labels(), &["b", "a", "c"]);
        assert_eq!(index.get(&"c"), Some(2));
        assert_eq!(index.get(&"z"), None);
    }

    #[test]
    fn test_intern_is_stable() {
        let mut index = LabelIndex::new();
        assert_eq!(index.intern(10), 0);
        assert_eq!(index.intern(20), 1);
        assert_eq!(index.intern(10), 0);
        assert_eq!(index.len(), 2);
    }
}
