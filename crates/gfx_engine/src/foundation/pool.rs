//! Generational resource pool
//!
//! The slot-recycling allocator that backs every resource table in the
//! engine. Each slot carries a generation counter that is bumped when the
//! slot's occupant is released, so any handle captured before the release
//! deterministically fails lookup afterwards instead of silently aliasing
//! whatever resource reused the slot.
//!
//! ## Ownership
//!
//! The pool takes exclusive ownership of every resource handed to
//! [`ResourcePool::allocate`] and disposes it (by dropping it) on release,
//! on [`ResourcePool::clear`], or when the pool itself is dropped. Callers
//! keep only [`PoolHandle`] values, which are plain copyable (index,
//! generation) pairs with no lifecycle of their own.
//!
//! ## Threading
//!
//! The pool is a single-owner data structure: every mutating operation takes
//! `&mut self`, so the borrow checker enforces the single-writer discipline.
//! Sharing a pool across threads requires an external lock around the whole
//! pool; the pool performs no internal synchronization.

use std::collections::VecDeque;

/// Capacity the backing arrays jump to on the first growth of an
/// empty pool. Subsequent growth doubles.
const MIN_CAPACITY: u32 = 4;

/// Opaque handle into a [`ResourcePool`].
///
/// A handle is a weak reference: holding one never keeps the resource alive,
/// and a handle outliving its resource is expected and safe. Validity is
/// decided entirely by the owning pool at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    index: u32,
    generation: u32,
}

impl PoolHandle {
    /// Sentinel handle that is invalid for every pool, without a lookup.
    pub const INVALID: Self = Self {
        index: u32::MAX,
        generation: 0,
    };

    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index this handle refers to.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation the slot must currently have for this handle to resolve.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether this is the [`PoolHandle::INVALID`] sentinel.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for PoolHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Generation-validated, slot-recycling store of exclusively-owned resources.
///
/// One pool instance exists per resource kind; the pool logic is identical
/// regardless of `T`, so kinds are separated by instantiation rather than
/// dispatch.
#[derive(Debug)]
pub struct ResourcePool<T> {
    /// Dense slot storage; `slots[i]` holds the current occupant of slot `i`.
    slots: Vec<Option<T>>,
    /// Parallel to `slots`; the generation a handle must match at index `i`.
    /// Generation 0 means the slot has never been occupied.
    generations: Vec<u32>,
    /// Indices available for reuse, in release order.
    free_slots: VecDeque<u32>,
    /// Next never-used index, handed out once `free_slots` is empty.
    next_index: u32,
}

impl<T> ResourcePool<T> {
    /// Create an empty pool. The backing arrays are allocated lazily on the
    /// first [`ResourcePool::allocate`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_slots: VecDeque::new(),
            next_index: 0,
        }
    }

    /// Create a pool with `capacity` slots pre-allocated.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(capacity, || None);
        Self {
            slots,
            generations: vec![0; capacity],
            free_slots: VecDeque::new(),
            next_index: 0,
        }
    }

    /// Number of live resources currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.next_index as usize - self.free_slots.len()
    }

    /// Whether the pool holds no live resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current slot capacity. Grows by doubling; never shrinks.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Store `resource` and return a handle to it.
    ///
    /// The pool takes exclusive ownership of the resource until the matching
    /// [`ResourcePool::release`]; the returned handle is valid immediately
    /// and stays valid until then. Freed slots are reused in FIFO order
    /// before any never-used slot is taken. Capacity grows transparently and
    /// never invalidates outstanding handles.
    pub fn allocate(&mut self, resource: T) -> PoolHandle {
        let index = if let Some(index) = self.free_slots.pop_front() {
            index
        } else {
            if self.next_index as usize == self.slots.len() {
                self.grow();
            }
            let index = self.next_index;
            self.next_index += 1;
            index
        };

        let slot = index as usize;
        debug_assert!(self.slots[slot].is_none(), "allocating into occupied slot");

        // First-ever occupancy of a slot is generation 1; a recycled slot
        // keeps the generation already bumped when its previous occupant
        // was retired. The counter moves exactly once per retirement.
        if self.generations[slot] == 0 {
            self.generations[slot] = 1;
        }
        self.slots[slot] = Some(resource);

        PoolHandle::new(index, self.generations[slot])
    }

    /// Look up the resource behind `handle`.
    ///
    /// Returns `None` for the [`PoolHandle::INVALID`] sentinel, a handle
    /// from another pool epoch (generation mismatch), an out-of-range index,
    /// or an emptied slot. Pure read; never panics, no side effects.
    #[must_use]
    pub fn try_get(&self, handle: PoolHandle) -> Option<&T> {
        if handle.index >= self.next_index {
            return None;
        }
        let slot = handle.index as usize;
        if self.generations[slot] != handle.generation {
            return None;
        }
        self.slots[slot].as_ref()
    }

    /// Mutable variant of [`ResourcePool::try_get`].
    #[must_use]
    pub fn try_get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        if handle.index >= self.next_index {
            return None;
        }
        let slot = handle.index as usize;
        if self.generations[slot] != handle.generation {
            return None;
        }
        self.slots[slot].as_mut()
    }

    /// Whether `handle` currently resolves to a live resource.
    #[must_use]
    pub fn is_valid(&self, handle: PoolHandle) -> bool {
        self.try_get(handle).is_some()
    }

    /// Dispose the resource behind `handle` and retire its slot.
    ///
    /// On success the slot's generation is incremented by exactly one and
    /// the index is queued for reuse, so every outstanding handle to the
    /// slot (including `handle` itself) is invalid from this point on.
    ///
    /// Releasing a stale, foreign, or sentinel handle is a no-op that
    /// returns `false`; double-release is therefore silent by contract.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        if !self.is_valid(handle) {
            log::debug!(
                "ignoring release of stale handle (index {}, generation {})",
                handle.index,
                handle.generation
            );
            return false;
        }

        let slot = handle.index as usize;
        // Drop the occupant before the slot becomes eligible for reuse.
        self.slots[slot] = None;
        self.generations[slot] += 1;
        self.free_slots.push_back(handle.index);
        true
    }

    /// Dispose every live resource and reset the pool to empty.
    ///
    /// Generations are never reset: every slot that held a resource gets its
    /// counter bumped, exactly as an individual release would, so handles
    /// captured before the clear can never validate against resources
    /// allocated after it.
    pub fn clear(&mut self) {
        for slot in 0..self.next_index as usize {
            if self.slots[slot].take().is_some() {
                self.generations[slot] += 1;
            }
        }
        self.free_slots.clear();
        self.next_index = 0;
    }

    fn grow(&mut self) {
        let capacity = self.slots.len();
        let new_capacity = if capacity == 0 {
            MIN_CAPACITY as usize
        } else {
            capacity * 2
        };
        self.slots.resize_with(new_capacity, || None);
        self.generations.resize(new_capacity, 0);
    }
}

impl<T> Default for ResourcePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Test resource that records its own disposal.
    struct Tracked {
        drops: Rc<Cell<u32>>,
    }

    impl Tracked {
        fn new(drops: &Rc<Cell<u32>>) -> Self {
            Self {
                drops: Rc::clone(drops),
            }
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn allocate_release_reuse_cycle() {
        let mut pool = ResourcePool::with_capacity(4);

        let a = pool.allocate("a");
        assert_eq!((a.index(), a.generation()), (0, 1));
        let b = pool.allocate("b");
        assert_eq!((b.index(), b.generation()), (1, 1));

        assert!(pool.release(a));
        assert!(pool.try_get(a).is_none());

        // Slot 0 is recycled with the generation bumped at release time.
        let c = pool.allocate("c");
        assert_eq!((c.index(), c.generation()), (0, 2));
        assert!(pool.try_get(a).is_none());
        assert_eq!(pool.try_get(c), Some(&"c"));
    }

    #[test]
    fn growth_preserves_outstanding_handles() {
        let mut pool = ResourcePool::with_capacity(4);
        let handles: Vec<_> = (0..5).map(|i| pool.allocate(i)).collect();

        assert_eq!(pool.capacity(), 8);
        assert_eq!(pool.len(), 5);
        for (i, handle) in handles.iter().enumerate() {
            assert_eq!(pool.try_get(*handle), Some(&i));
        }
    }

    #[test]
    fn double_release_bumps_generation_once() {
        let mut pool = ResourcePool::new();
        let handle = pool.allocate(7);

        assert!(pool.release(handle));
        assert!(!pool.release(handle));

        // A single increment total: the recycled slot hands out generation 2.
        let next = pool.allocate(8);
        assert_eq!((next.index(), next.generation()), (0, 2));
    }

    #[test]
    fn stale_release_leaves_pool_untouched() {
        let mut pool = ResourcePool::new();
        let a = pool.allocate("a");
        assert!(pool.release(a));

        let before_len = pool.len();
        assert!(!pool.release(a));
        assert!(!pool.release(PoolHandle::INVALID));
        assert!(!pool.release(PoolHandle::new(99, 1)));
        assert_eq!(pool.len(), before_len);

        // The free queue was not corrupted: exactly one slot to reuse.
        let b = pool.allocate("b");
        assert_eq!(b.index(), 0);
        let c = pool.allocate("c");
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn sentinel_handle_never_resolves() {
        let mut pool = ResourcePool::new();
        let _live = pool.allocate(1);

        assert!(pool.try_get(PoolHandle::INVALID).is_none());
        assert!(!pool.is_valid(PoolHandle::INVALID));
        assert!(PoolHandle::INVALID.is_invalid());
        assert!(PoolHandle::default().is_invalid());
    }

    #[test]
    fn generation_progresses_one_per_cycle() {
        let mut pool = ResourcePool::new();
        let mut stale = Vec::new();

        for expected_generation in 1..=3 {
            let handle = pool.allocate(expected_generation);
            assert_eq!(handle.index(), 0);
            assert_eq!(handle.generation(), expected_generation);
            for old in &stale {
                assert!(pool.try_get(*old).is_none());
            }
            assert!(pool.release(handle));
            stale.push(handle);
        }
    }

    #[test]
    fn live_handles_have_distinct_indices() {
        let mut pool = ResourcePool::new();
        let mut handles = Vec::new();
        for i in 0..64 {
            handles.push(pool.allocate(i));
            if i % 3 == 0 {
                let victim = handles.swap_remove(handles.len() / 2);
                assert!(pool.release(victim));
            }
        }

        let mut indices: Vec<_> = handles.iter().map(PoolHandle::index).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), handles.len());
        assert_eq!(pool.len(), handles.len());
    }

    #[test]
    fn freed_slots_are_reused_in_release_order() {
        let mut pool = ResourcePool::new();
        let handles: Vec<_> = (0..4).map(|i| pool.allocate(i)).collect();

        assert!(pool.release(handles[2]));
        assert!(pool.release(handles[0]));

        assert_eq!(pool.allocate(10).index(), 2);
        assert_eq!(pool.allocate(11).index(), 0);
        assert_eq!(pool.allocate(12).index(), 4);
    }

    #[test]
    fn round_trip_preserves_resource_identity() {
        let mut pool = ResourcePool::new();
        let payload = vec![1u8, 2, 3];
        let handle = pool.allocate(payload.clone());
        assert_eq!(pool.try_get(handle), Some(&payload));

        if let Some(stored) = pool.try_get_mut(handle) {
            stored.push(4);
        }
        assert_eq!(pool.try_get(handle), Some(&vec![1u8, 2, 3, 4]));
    }

    #[test]
    fn release_and_clear_dispose_resources() {
        let drops = Rc::new(Cell::new(0));
        let mut pool = ResourcePool::new();

        let a = pool.allocate(Tracked::new(&drops));
        let _b = pool.allocate(Tracked::new(&drops));
        let _c = pool.allocate(Tracked::new(&drops));

        assert!(pool.release(a));
        assert_eq!(drops.get(), 1);

        // Double release must not dispose twice.
        assert!(!pool.release(a));
        assert_eq!(drops.get(), 1);

        pool.clear();
        assert_eq!(drops.get(), 3);
        assert!(pool.is_empty());
    }

    #[test]
    fn pool_drop_disposes_remaining_resources() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut pool = ResourcePool::new();
            pool.allocate(Tracked::new(&drops));
            pool.allocate(Tracked::new(&drops));
        }
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn clear_invalidates_all_prior_handles() {
        let mut pool = ResourcePool::new();
        let handles: Vec<_> = (0..6).map(|i| pool.allocate(i)).collect();
        assert!(pool.release(handles[1]));

        pool.clear();
        assert_eq!(pool.len(), 0);
        for handle in &handles {
            assert!(pool.try_get(*handle).is_none());
        }

        // Slot 0 saw generation 1 before the clear bumped it; the next
        // occupant continues the sequence instead of restarting it.
        let fresh = pool.allocate(42);
        assert_eq!((fresh.index(), fresh.generation()), (0, 2));
        assert_eq!(pool.try_get(fresh), Some(&42));
        for handle in &handles {
            assert!(pool.try_get(*handle).is_none());
        }
    }

    /// Shadow-model check: every handle ever issued is replayed against a
    /// recorded expectation after each mutation.
    #[test]
    fn randomized_ops_match_shadow_model() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut pool = ResourcePool::new();
        // (handle, payload, expected live)
        let mut issued: Vec<(PoolHandle, u32, bool)> = Vec::new();

        for step in 0..4_000u32 {
            match rng.gen_range(0..100) {
                0..=54 => {
                    let handle = pool.allocate(step);
                    issued.push((handle, step, true));
                }
                55..=97 => {
                    if issued.is_empty() {
                        continue;
                    }
                    let pick = rng.gen_range(0..issued.len());
                    let (handle, _, live) = issued[pick];
                    assert_eq!(pool.release(handle), live);
                    if live {
                        issued[pick].2 = false;
                    }
                }
                _ => {
                    pool.clear();
                    for entry in &mut issued {
                        entry.2 = false;
                    }
                }
            }

            assert_eq!(pool.len(), issued.iter().filter(|e| e.2).count());
            for (handle, payload, live) in &issued {
                match pool.try_get(*handle) {
                    Some(stored) => {
                        assert!(*live, "stale handle resolved");
                        assert_eq!(stored, payload);
                    }
                    None => assert!(!*live, "live handle failed to resolve"),
                }
            }
        }
    }
}
