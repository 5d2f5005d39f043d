//! In-memory ancestor store.

use std::collections::{BTreeMap, HashMap};

use crate::chain::DIFFICULTY_TRANSITION_INTERVAL;
use crate::storage::AncestorStore;
use crate::types::{BlockHash, HeaderRef};

/// Bounded in-memory window of accepted headers.
///
/// Keeps the `capacity` highest headers and evicts the lowest ones first. The default
/// capacity holds one full transition interval plus the boundary block before it.
#[derive(Debug, Clone)]
pub struct MemoryAncestorStore {
    headers: HashMap<BlockHash, HeaderRef>,
    // Height index for eviction, a height can hold several competing headers
    by_height: BTreeMap<u32, Vec<BlockHash>>,
    capacity: usize,
}

impl Default for MemoryAncestorStore {
    fn default() -> Self {
        Self::with_capacity(DIFFICULTY_TRANSITION_INTERVAL as usize + 1)
    }
}

impl MemoryAncestorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that never holds more than `capacity` headers. A capacity of zero is bumped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            headers: HashMap::new(),
            by_height: BTreeMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Adds an accepted header, evicting the lowest headers once over capacity.
    pub fn insert(&mut self, header: HeaderRef) {
        if self.headers.insert(header.hash, header).is_none() {
            self.by_height.entry(header.height).or_default().push(header.hash);
        }

        while self.headers.len() > self.capacity {
            let Some(mut lowest) = self.by_height.first_entry() else {
                break;
            };
            if let Some(hash) = lowest.get_mut().pop() {
                self.headers.remove(&hash);
            }
            if lowest.get().is_empty() {
                lowest.remove();
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = HeaderRef>>(&mut self, headers: I) {
        for header in headers {
            self.insert(header);
        }
    }

    pub fn remove(&mut self, hash: &BlockHash) -> Option<HeaderRef> {
        let header = self.headers.remove(hash)?;
        if let Some(hashes) = self.by_height.get_mut(&header.height) {
            hashes.retain(|h| h != hash);
            if hashes.is_empty() {
                self.by_height.remove(&header.height);
            }
        }
        Some(header)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Highest stored height.
    pub fn tip_height(&self) -> Option<u32> {
        self.by_height.last_key_value().map(|(height, _)| *height)
    }
}

impl AncestorStore for MemoryAncestorStore {
    fn lookup(&self, hash: &BlockHash) -> Option<HeaderRef> {
        self.headers.get(hash).copied()
    }
}

#[cfg(test)]
mod tests {
    use bitcoin_hashes::Hash;

    use super::*;

    fn header(height: u32, fork: u8) -> HeaderRef {
        let mut hash = [0u8; 32];
        hash[..4].copy_from_slice(&height.to_le_bytes());
        hash[4] = fork;
        let mut prev = [0u8; 32];
        prev[..4].copy_from_slice(&height.wrapping_sub(1).to_le_bytes());
        HeaderRef {
            height,
            hash: BlockHash::from_byte_array(hash),
            prev_hash: BlockHash::from_byte_array(prev),
            timestamp: 1_600_000_000 + height,
            target: 0x1d00ffff,
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut store = MemoryAncestorStore::new();
        let h = header(10, 0);
        store.insert(h);

        assert_eq!(store.lookup(&h.hash), Some(h));
        assert_eq!(store.lookup(&header(11, 0).hash), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.tip_height(), Some(10));
    }

    #[test]
    fn test_default_capacity_covers_full_interval() {
        let store = MemoryAncestorStore::default();
        assert_eq!(store.capacity(), 2017);
    }

    #[test]
    fn test_evicts_lowest_heights() {
        let mut store = MemoryAncestorStore::with_capacity(3);
        store.extend((0..5).map(|height| header(height, 0)));

        assert_eq!(store.len(), 3);
        assert!(store.lookup(&header(0, 0).hash).is_none());
        assert!(store.lookup(&header(1, 0).hash).is_none());
        assert!(store.lookup(&header(2, 0).hash).is_some());
        assert_eq!(store.tip_height(), Some(4));
    }

    #[test]
    fn test_competing_headers_at_same_height() {
        let mut store = MemoryAncestorStore::with_capacity(10);
        store.insert(header(7, 0));
        store.insert(header(7, 1));
        assert_eq!(store.len(), 2);

        store.remove(&header(7, 0).hash);
        assert_eq!(store.len(), 1);
        assert!(store.lookup(&header(7, 1).hash).is_some());
        assert_eq!(store.tip_height(), Some(7));
    }

    #[test]
    fn test_reinsert_is_idempotent() {
        let mut store = MemoryAncestorStore::with_capacity(2);
        store.insert(header(1, 0));
        store.insert(header(1, 0));
        store.insert(header(2, 0));
        assert_eq!(store.len(), 2);
        assert!(store.lookup(&header(1, 0).hash).is_some());
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut store = MemoryAncestorStore::with_capacity(0);
        store.insert(header(1, 0));
        store.insert(header(2, 0));
        assert_eq!(store.len(), 1);
        assert!(store.lookup(&header(2, 0).hash).is_some());
    }
}
