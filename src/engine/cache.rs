//! # Snapshot Cache
//!
//! Keyed memoization for the calculators. Each calculator owns one cache,
//! keyed by character id, holding the last result for that character
//! together with a digest of the fields the calculation depends on. This
//! replaces the single-slot last-value cache of earlier tools, which
//! silently returned stale results when two characters shared a calculator.

use crate::character::CharacterId;
use crate::VitalityResult;
use serde::Serialize;
use sha2::{Digest as _, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// Structural digest of a calculation's inputs.
pub type InputDigest = [u8; 32];

/// Hashes a serializable projection of the character fields a calculation
/// reads. Canonical because projections are plain structs with a fixed
/// field order.
pub fn digest_of<P: Serialize>(projection: &P) -> VitalityResult<InputDigest> {
    let bytes = serde_json::to_vec(projection)?;
    Ok(Sha256::digest(&bytes).into())
}

/// Per-character memoization slots for one calculator.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    slots: HashMap<CharacterId, (InputDigest, Arc<T>)>,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotCache<T> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Returns the cached result for a character when its input digest is
    /// unchanged. The returned `Arc` is pointer-identical across hits.
    pub fn get(&self, id: CharacterId, digest: &InputDigest) -> Option<Arc<T>> {
        self.slots
            .get(&id)
            .filter(|(stored, _)| stored == digest)
            .map(|(_, value)| Arc::clone(value))
    }

    /// Stores a fresh result for a character, replacing any previous slot.
    pub fn put(&mut self, id: CharacterId, digest: InputDigest, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.slots.insert(id, (digest, Arc::clone(&value)));
        value
    }

    /// Drops the slot for a single character.
    pub fn invalidate(&mut self, id: CharacterId) {
        self.slots.remove(&id);
    }

    /// Drops every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of characters currently cached.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no character is cached.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::new_character_id;

    #[test]
    fn test_hit_requires_matching_digest() {
        let mut cache: SnapshotCache<u32> = SnapshotCache::new();
        let id = new_character_id();
        let digest_a = digest_of(&("a", 1)).unwrap();
        let digest_b = digest_of(&("a", 2)).unwrap();

        cache.put(id, digest_a, 7);
        assert_eq!(cache.get(id, &digest_a).as_deref(), Some(&7));
        assert!(cache.get(id, &digest_b).is_none());
    }

    #[test]
    fn test_hits_are_pointer_identical() {
        let mut cache: SnapshotCache<u32> = SnapshotCache::new();
        let id = new_character_id();
        let digest = digest_of(&"fixed").unwrap();

        let stored = cache.put(id, digest, 42);
        let hit = cache.get(id, &digest).unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
    }

    #[test]
    fn test_characters_do_not_evict_each_other() {
        let mut cache: SnapshotCache<u32> = SnapshotCache::new();
        let first = new_character_id();
        let second = new_character_id();
        let digest = digest_of(&"shared").unwrap();

        cache.put(first, digest, 1);
        cache.put(second, digest, 2);
        assert_eq!(cache.get(first, &digest).as_deref(), Some(&1));
        assert_eq!(cache.get(second, &digest).as_deref(), Some(&2));
    }

    #[test]
    fn test_invalidate_single_character() {
        let mut cache: SnapshotCache<u32> = SnapshotCache::new();
        let id = new_character_id();
        let digest = digest_of(&"x").unwrap();

        cache.put(id, digest, 5);
        cache.invalidate(id);
        assert!(cache.get(id, &digest).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_digest_is_structural() {
        let a = digest_of(&(3u8, vec!["swift"])).unwrap();
        let b = digest_of(&(3u8, vec!["swift"])).unwrap();
        let c = digest_of(&(4u8, vec!["swift"])).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
