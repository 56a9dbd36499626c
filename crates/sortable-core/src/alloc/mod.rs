//! Allocation and collection types for Sortable.
//!
//! This module provides:
//! - Re-exports of hash collections using AHash
//! - Insertion-ordered maps/sets for caches whose iteration order matters
//! - A generational [`Arena`] handing out copyable handles

pub mod arena;

pub use arena::{Arena, Handle};

// Re-export optimized hash collections
pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

/// Insertion-ordered map hashed with AHash.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, RandomState>;

/// Insertion-ordered set hashed with AHash.
pub type IndexSet<T> = indexmap::IndexSet<T, RandomState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("key", "value");
        assert_eq!(map.get("key"), Some(&"value"));
    }

    #[test]
    fn test_index_map_keeps_insertion_order() {
        let mut map = IndexMap::default();
        map.insert("document", 0);
        map.insert("list", 1);
        map.insert("scroller", 2);
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["document", "list", "scroller"]);
    }
}
