//! Specialized collection types
//!
//! Generational slot maps back every arena in the engine: a key outlives the
//! value it pointed at without ever aliasing a newer one, which is how stale
//! entity handles are detected.

pub use slotmap::{new_key_type, Key, SecondaryMap, SlotMap};

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;

#[cfg(test)]
mod tests {
    use super::*;

    new_key_type! {
        struct TestKey;
    }

    #[test]
    fn test_removed_key_never_aliases_new_value() {
        let mut map: HandleMap<TestKey, &str> = HandleMap::with_key();
        let first = map.insert("first");
        map.remove(first);
        let second = map.insert("second");

        assert!(map.get(first).is_none());
        assert_eq!(map.get(second), Some(&"second"));
    }
}
