//! `CoordMap` — an open-addressed linear-probing table keyed by [`Coord`].
//!
//! The hashing strategy is a type parameter. Slots are lazily cleared with an
//! epoch stamp, so a generation can start from an empty table without
//! touching the backing array; a full sweep only happens when the stamp
//! wraps around. Occupied slot indices are kept in a side list so iteration
//! costs O(len) however large the table once grew.

use std::marker::PhantomData;

use super::coord::Coord;
use super::hash::CoordHasher;

/// Maximum load factor numerator / denominator: 3/4.
const LOAD_NUM: usize = 3;
const LOAD_DEN: usize = 4;
const MIN_SLOTS: usize = 16;
/// An empty table more than this many times larger than a reservation asks
/// for is reallocated at the smaller size.
const SHRINK_RATIO: usize = 8;

#[derive(Clone, Copy)]
struct Slot<V> {
    key: Coord,
    /// Equal to the map's current stamp iff the slot is occupied.
    stamp: u32,
    value: V,
}

impl<V: Default> Slot<V> {
    #[inline(always)]
    fn vacant() -> Self {
        Self {
            key: Coord::ORIGIN,
            stamp: 0,
            value: V::default(),
        }
    }
}

#[inline]
fn slots_for(keys: usize) -> usize {
    keys.saturating_mul(LOAD_DEN)
        .div_ceil(LOAD_NUM)
        .next_power_of_two()
        .max(MIN_SLOTS)
}

pub struct CoordMap<V, H> {
    slots: Vec<Slot<V>>,
    /// `slots.len() - 1`. The slot count is always a power of two.
    mask: usize,
    /// Indices of the slots carrying the current stamp, in insertion order.
    occupied: Vec<usize>,
    /// Slot count the map was created with; shrinking never goes below it.
    floor: usize,
    stamp: u32,
    _hasher: PhantomData<fn() -> H>,
}

impl<V: Copy + Default, H: CoordHasher> Default for CoordMap<V, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Copy + Default, H: CoordHasher> CoordMap<V, H> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map with room for at least `cap` keys before growing.
    pub fn with_capacity(cap: usize) -> Self {
        let slots = slots_for(cap);
        Self {
            slots: vec![Slot::vacant(); slots],
            mask: slots - 1,
            occupied: Vec::new(),
            floor: slots,
            stamp: 1,
            _hasher: PhantomData,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    /// Number of keys the map holds before the next growth.
    pub fn capacity(&self) -> usize {
        self.slots.len() * LOAD_NUM / LOAD_DEN
    }

    /// Drop every entry in O(1) by advancing the epoch stamp.
    #[inline]
    pub fn clear(&mut self) {
        self.occupied.clear();
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.stamp = 1;
            for slot in &mut self.slots {
                slot.stamp = 0;
            }
        }
    }

    /// Make sure `keys` entries fit without rehashing. An empty map far
    /// larger than needed is reallocated down to size.
    #[inline]
    pub fn reserve_for(&mut self, keys: usize) {
        let needed = slots_for(keys).max(self.floor);
        if needed > self.slots.len() {
            self.resize(needed);
        } else if self.is_empty() && self.slots.len() / SHRINK_RATIO >= needed {
            self.resize(needed);
        }
    }

    #[inline(always)]
    fn needs_grow(&self) -> bool {
        self.occupied.len() * LOAD_DEN >= self.slots.len() * LOAD_NUM
    }

    #[cold]
    fn resize(&mut self, new_slots: usize) {
        debug_assert!(new_slots.is_power_of_two());
        tracing::debug!(
            hasher = H::NAME,
            len = self.occupied.len(),
            from = self.slots.len(),
            to = new_slots,
            "coord map resize"
        );
        let live = self.occupied.len();
        let old_slots = std::mem::replace(&mut self.slots, vec![Slot::vacant(); new_slots]);
        let old_occupied = std::mem::replace(&mut self.occupied, Vec::with_capacity(live));
        self.mask = new_slots - 1;

        // Fresh slots carry stamp 0, which is never a live stamp.
        for idx in old_occupied {
            let slot = old_slots[idx];
            self.place_rehash(slot.key, slot.value);
        }
    }

    #[inline(always)]
    fn place_rehash(&mut self, key: Coord, value: V) {
        let mask = self.mask;
        let stamp = self.stamp;
        let mut pos = H::hash(key) as usize & mask;
        loop {
            let slot = &mut self.slots[pos];
            if slot.stamp != stamp {
                *slot = Slot { key, stamp, value };
                self.occupied.push(pos);
                return;
            }
            pos = (pos + 1) & mask;
        }
    }

    /// Slot index holding `key`, or the vacant slot that ends its probe run.
    #[inline(always)]
    fn probe(&self, key: Coord) -> (usize, bool) {
        let mask = self.mask;
        let mut pos = H::hash(key) as usize & mask;
        loop {
            // SAFETY: `pos` is always masked by `slots.len() - 1`.
            let slot = unsafe { self.slots.get_unchecked(pos) };
            if slot.stamp != self.stamp {
                return (pos, false);
            }
            if slot.key == key {
                return (pos, true);
            }
            pos = (pos + 1) & mask;
        }
    }

    #[inline]
    pub fn get(&self, key: Coord) -> Option<V> {
        match self.probe(key) {
            (pos, true) => Some(self.slots[pos].value),
            _ => None,
        }
    }

    #[inline]
    pub fn contains(&self, key: Coord) -> bool {
        self.probe(key).1
    }

    /// Insert or overwrite. Returns the previous value if `key` was present.
    #[inline]
    pub fn insert(&mut self, key: Coord, value: V) -> Option<V> {
        if self.needs_grow() {
            self.resize(self.slots.len() * 2);
        }
        let (pos, found) = self.probe(key);
        let slot = &mut self.slots[pos];
        if found {
            return Some(std::mem::replace(&mut slot.value, value));
        }
        *slot = Slot {
            key,
            stamp: self.stamp,
            value,
        };
        self.occupied.push(pos);
        None
    }

    /// Mutable access to the value at `key`, inserting `V::default()` first
    /// if it is absent.
    #[inline]
    pub fn value_or_default(&mut self, key: Coord) -> &mut V {
        if self.needs_grow() {
            self.resize(self.slots.len() * 2);
        }
        let (pos, found) = self.probe(key);
        if !found {
            self.slots[pos] = Slot {
                key,
                stamp: self.stamp,
                value: V::default(),
            };
            self.occupied.push(pos);
        }
        &mut self.slots[pos].value
    }

    /// Live entries in insertion order, which carries no meaning.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, V)> + '_ {
        self.occupied.iter().map(|&idx| {
            let slot = &self.slots[idx];
            (slot.key, slot.value)
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = Coord> + '_ {
        self.iter().map(|(key, _)| key)
    }
}

impl<V: Copy, H> Clone for CoordMap<V, H> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            mask: self.mask,
            occupied: self.occupied.clone(),
            floor: self.floor,
            stamp: self.stamp,
            _hasher: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparselife::hash::{CombineHash, SplitMixHash};

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn insert_get_overwrite() {
        let mut m = CoordMap::<u32, SplitMixHash>::with_capacity(64);
        assert!(m.get(c(10, 20)).is_none());

        assert_eq!(m.insert(c(10, 20), 42), None);
        assert_eq!(m.get(c(10, 20)), Some(42));
        assert_eq!(m.len(), 1);

        assert_eq!(m.insert(c(10, 20), 99), Some(42));
        assert_eq!(m.get(c(10, 20)), Some(99));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn negative_and_extreme_coords() {
        let mut m = CoordMap::<u8, CombineHash>::with_capacity(16);
        m.insert(c(-5, -10), 1);
        m.insert(c(0, 0), 2);
        m.insert(c(i32::MIN, i32::MAX), 3);

        assert_eq!(m.get(c(-5, -10)), Some(1));
        assert_eq!(m.get(c(0, 0)), Some(2));
        assert_eq!(m.get(c(i32::MIN, i32::MAX)), Some(3));
        assert!(!m.contains(c(i32::MAX, i32::MIN)));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn grow_under_pressure() {
        let mut m = CoordMap::<u32, CombineHash>::with_capacity(4);
        for i in 0..5000i32 {
            m.insert(c(i, i * 3), i as u32);
        }
        assert_eq!(m.len(), 5000);
        assert!(m.capacity() >= 5000);
        for i in 0..5000i32 {
            assert_eq!(m.get(c(i, i * 3)), Some(i as u32));
        }
    }

    #[test]
    fn value_or_default_accumulates() {
        let mut m = CoordMap::<u8, SplitMixHash>::new();
        for _ in 0..3 {
            *m.value_or_default(c(1, 1)) += 1;
        }
        *m.value_or_default(c(2, 2)) += 1;
        assert_eq!(m.get(c(1, 1)), Some(3));
        assert_eq!(m.get(c(2, 2)), Some(1));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn clear_resets_without_reallocating() {
        let mut m = CoordMap::<(), SplitMixHash>::with_capacity(1024);
        let slots_before = m.slots.len();
        m.insert(c(1, 2), ());
        m.insert(c(-5, 9), ());

        m.clear();
        assert!(m.is_empty());
        assert!(!m.contains(c(1, 2)));
        assert_eq!(m.insert(c(1, 2), ()), None);
        assert_eq!(m.insert(c(1, 2), ()), Some(()));
        assert_eq!(m.slots.len(), slots_before);
    }

    #[test]
    fn stamp_wraparound_sweeps_stale_slots() {
        let mut m = CoordMap::<u8, CombineHash>::with_capacity(16);
        m.stamp = u32::MAX;
        m.insert(c(3, 4), 7);
        assert_eq!(m.get(c(3, 4)), Some(7));

        m.clear();
        assert_eq!(m.stamp, 1);
        assert!(m.slots.iter().all(|slot| slot.stamp == 0));
        assert!(!m.contains(c(3, 4)));
    }

    #[test]
    fn reserve_and_insert_many() {
        let mut m = CoordMap::<(), SplitMixHash>::with_capacity(8);
        m.reserve_for(10_000);
        let slots = m.slots.len();
        for i in 0..10_000i32 {
            assert_eq!(m.insert(c(i, -i), ()), None);
        }
        assert_eq!(m.slots.len(), slots, "reserved map must not regrow");
        for i in 0..10_000i32 {
            assert!(m.contains(c(i, -i)));
        }
    }

    #[test]
    fn iter_yields_all_entries() {
        let mut m = CoordMap::<u32, CombineHash>::with_capacity(32);
        for i in 0..50i32 {
            m.insert(c(i, -i), i as u32);
        }
        let mut collected: Vec<_> = m.iter().collect();
        collected.sort_by_key(|&(_, v)| v);
        assert_eq!(collected.len(), 50);
        for (i, &(key, v)) in collected.iter().enumerate() {
            assert_eq!(key, c(i as i32, -(i as i32)));
            assert_eq!(v, i as u32);
        }
    }

    #[test]
    fn iteration_skips_vacant_slots_of_a_grown_table() {
        let mut m = CoordMap::<u8, SplitMixHash>::new();
        for i in 0..100_000i32 {
            m.insert(c(i, i), 1);
        }
        let grown = m.slots.len();
        m.clear();
        assert!(m.occupied.is_empty());

        for i in 0..3 {
            *m.value_or_default(c(i, 0)) += 1;
        }
        assert_eq!(m.slots.len(), grown);
        assert_eq!(m.occupied.len(), 3);
        assert_eq!(m.iter().count(), 3);
    }

    #[test]
    fn empty_reserve_shrinks_oversized_table() {
        let mut m = CoordMap::<u8, CombineHash>::new();
        m.reserve_for(500_000);
        for i in 0..1000i32 {
            m.insert(c(i, -i), 1);
        }
        assert!(m.slots.len() >= slots_for(500_000));

        // Not empty: keep the big table.
        m.reserve_for(10);
        assert!(m.slots.len() >= slots_for(500_000));

        m.clear();
        m.reserve_for(24);
        assert_eq!(m.slots.len(), slots_for(24));
        assert!(m.is_empty());
        m.insert(c(7, 7), 2);
        assert_eq!(m.get(c(7, 7)), Some(2));
        assert_eq!(m.get(c(0, 0)), None);
    }

    #[test]
    fn shrink_stops_at_constructed_size() {
        let mut m = CoordMap::<(), SplitMixHash>::with_capacity(1000);
        let initial = m.slots.len();
        m.reserve_for(200_000);
        m.clear();
        m.reserve_for(1);
        assert_eq!(m.slots.len(), initial);

        // Within the ratio nothing is reallocated.
        m.reserve_for(initial);
        let sized = m.slots.len();
        m.clear();
        m.reserve_for(initial / 2);
        assert_eq!(m.slots.len(), sized);
    }

    #[test]
    fn grow_after_clear_drops_stale_entries() {
        let mut m = CoordMap::<u8, SplitMixHash>::with_capacity(8);
        for i in 0..8 {
            m.insert(c(i, 0), 1);
        }
        m.clear();
        for i in 100..200 {
            m.insert(c(i, 0), 2);
        }
        assert_eq!(m.len(), 100);
        assert!(m.iter().all(|(_, v)| v == 2));
        assert!(!m.contains(c(0, 0)));
    }
}
