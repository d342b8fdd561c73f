//! Hash collections used throughout Trellis.
//!
//! Re-exports of the AHash-backed map and set so every crate in the workspace
//! agrees on one hasher.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("cat", 3);
        assert_eq!(map.get("cat"), Some(&3));
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert("toolbar");
        assert!(set.contains("toolbar"));
        assert!(!set.contains("menu"));
    }
}
