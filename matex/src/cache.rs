//! Bounded LRU slab cache for extracted lines
//!
//! The cache holds at most one payload per primary index, within a byte
//! budget, and evicts in least-recently-used order. Slots live in an arena
//! and the LRU list is linked by slot index rather than pointers. Presence
//! or absence of a payload in the cache never changes extraction output,
//! only how often the backend is consulted.

use hashbrown::HashMap;

use matex_core::SparseLine;

/// Sentinel for "no slot" in the index-linked LRU list
const NIL: usize = usize::MAX;

/// Resident byte size of a cacheable payload
pub trait SlabSize {
    fn size_bytes(&self) -> usize;
}

impl SlabSize for Vec<f64> {
    fn size_bytes(&self) -> usize {
        self.len() * core::mem::size_of::<f64>()
    }
}

impl SlabSize for SparseLine {
    fn size_bytes(&self) -> usize {
        // value + index per stored entry
        self.len() * (core::mem::size_of::<f64>() + core::mem::size_of::<u32>())
    }
}

struct Slot<P> {
    key: usize,
    payload: P,
    prev: usize,
    next: usize,
}

/// Byte-bounded most-recently-used store of per-index payloads
///
/// A zero capacity disables caching entirely; every lookup then runs the
/// fetch closure and hands the payload straight back.
pub struct SlabCache<P: SlabSize> {
    capacity: usize,
    used: usize,
    map: HashMap<usize, usize>,
    slots: Vec<Slot<P>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    // Holding area for payloads too large to retain
    bypass: Option<P>,
}

impl<P: SlabSize> SlabCache<P> {
    /// Create a cache with the given byte budget
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            used: 0,
            map: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            bypass: None,
        }
    }

    /// Whether any payload can ever be retained
    pub fn enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Byte budget this cache was constructed with
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently resident
    pub fn used(&self) -> usize {
        self.used
    }

    /// Number of payloads currently resident
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Resolve one primary index, consulting the backend on a miss
    ///
    /// On a hit the stored payload is returned unchanged and promoted to
    /// most-recently-used. On a miss `fetch` runs, older entries are evicted
    /// until the new payload fits, and the payload is retained if the budget
    /// allows. A payload larger than the whole budget is returned without
    /// being retained; that is not an error.
    pub fn get_or_fetch<F: FnOnce() -> P>(&mut self, key: usize, fetch: F) -> &P {
        let hit = self.map.get(&key).copied();
        if let Some(slot) = hit {
            self.unlink(slot);
            self.link_front(slot);
            return &self.slots[slot].payload;
        }

        let payload = fetch();
        let size = payload.size_bytes();
        // A disabled cache retains nothing, not even zero-sized payloads.
        if !self.enabled() || size > self.capacity {
            return &*self.bypass.insert(payload);
        }

        while self.used + size > self.capacity {
            self.evict_lru();
        }

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Slot { key, payload, prev: NIL, next: NIL };
                slot
            }
            None => {
                self.slots.push(Slot { key, payload, prev: NIL, next: NIL });
                self.slots.len() - 1
            }
        };
        self.link_front(slot);
        self.map.insert(key, slot);
        self.used += size;
        &self.slots[slot].payload
    }

    /// Whether a payload for this index is currently resident
    pub fn contains(&self, key: usize) -> bool {
        self.map.contains_key(&key)
    }

    fn evict_lru(&mut self) {
        let slot = self.tail;
        debug_assert_ne!(slot, NIL, "eviction from an empty cache");
        self.unlink(slot);
        self.map.remove(&self.slots[slot].key);
        self.used -= self.slots[slot].payload.size_bytes();
        self.free.push(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.slots[slot].prev, self.slots[slot].next);
        if prev != NIL {
            self.slots[prev].next = next;
        } else if self.head == slot {
            self.head = next;
        }
        if next != NIL {
            self.slots[next].prev = prev;
        } else if self.tail == slot {
            self.tail = prev;
        }
        self.slots[slot].prev = NIL;
        self.slots[slot].next = NIL;
    }

    fn link_front(&mut self, slot: usize) {
        self.slots[slot].prev = NIL;
        self.slots[slot].next = self.head;
        if self.head != NIL {
            self.slots[self.head].prev = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(tag: f64, len: usize) -> Vec<f64> {
        vec![tag; len]
    }

    #[test]
    fn test_hit_returns_stored_payload() {
        let mut cache = SlabCache::new(1024);
        cache.get_or_fetch(3, || line(3.0, 4));
        // A second resolve must not re-run the fetch.
        let out = cache.get_or_fetch(3, || unreachable!("fetch on a hit"));
        assert_eq!(out, &line(3.0, 4));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.used(), 32);
    }

    #[test]
    fn test_zero_capacity_is_pass_through() {
        let mut cache = SlabCache::new(0);
        assert!(!cache.enabled());
        assert_eq!(cache.get_or_fetch(0, || line(1.0, 2)), &line(1.0, 2));
        assert_eq!(cache.len(), 0);
        assert!(!cache.contains(0));
        // Every call re-fetches.
        assert_eq!(cache.get_or_fetch(0, || line(5.0, 2)), &line(5.0, 2));
    }

    #[test]
    fn test_lru_eviction_order() {
        // Room for exactly two 4-element lines.
        let mut cache = SlabCache::new(64);
        cache.get_or_fetch(0, || line(0.0, 4));
        cache.get_or_fetch(1, || line(1.0, 4));
        // Touch 0 so that 1 becomes least recently used.
        cache.get_or_fetch(0, || unreachable!());
        cache.get_or_fetch(2, || line(2.0, 4));
        assert!(cache.contains(0));
        assert!(!cache.contains(1));
        assert!(cache.contains(2));
        assert_eq!(cache.used(), 64);
    }

    #[test]
    fn test_untouched_entries_evict_in_insertion_order() {
        let mut cache = SlabCache::new(64);
        cache.get_or_fetch(0, || line(0.0, 4));
        cache.get_or_fetch(1, || line(1.0, 4));
        cache.get_or_fetch(2, || line(2.0, 4));
        assert!(!cache.contains(0));
        assert!(cache.contains(1));
        assert!(cache.contains(2));
    }

    #[test]
    fn test_oversized_payload_bypasses() {
        let mut cache = SlabCache::new(32);
        cache.get_or_fetch(0, || line(0.0, 4));
        // 8 elements = 64 bytes > 32-byte budget: returned but never stored,
        // and the resident entry is untouched.
        assert_eq!(cache.get_or_fetch(9, || line(9.0, 8)), &line(9.0, 8));
        assert!(!cache.contains(9));
        assert!(cache.contains(0));
        assert_eq!(cache.used(), 32);
    }

    #[test]
    fn test_zero_capacity_never_retains_empty_payloads() {
        // Zero-sized payloads fit in any budget arithmetically, but a
        // disabled cache must stay empty for them too.
        let mut cache = SlabCache::new(0);
        cache.get_or_fetch(0, || line(0.0, 0));
        cache.get_or_fetch(1, || line(0.0, 0));
        assert!(cache.is_empty());
        assert!(!cache.contains(0));
        assert_eq!(cache.used(), 0);
    }

    #[test]
    fn test_sparse_payload_sizing() {
        let payload = SparseLine {
            indices: vec![0, 5, 9],
            values: vec![1.0, 2.0, 3.0],
        };
        assert_eq!(payload.size_bytes(), 36);
    }

    #[test]
    fn test_slot_reuse_after_eviction() {
        let mut cache = SlabCache::new(32);
        for key in 0..100 {
            cache.get_or_fetch(key, || line(key as f64, 4));
        }
        // One resident line at a time, so the arena never grows past the
        // initial slot plus the one in flight.
        assert_eq!(cache.len(), 1);
        assert!(cache.slots.len() <= 2);
        assert!(cache.contains(99));
    }
}
