//! Handle & Generational Pool — the pool half.
//!
//! A parallel generation array plus a free-index stack backs the pool, with
//! a fixed 20/12-bit handle packing and direct index-to-slot mapping (no
//! swap-on-erase — only index stability across growth is required, not
//! compaction).

use crate::error::FatalError;
use crate::handle::{Handle, MAX_GENERATION};

const INITIAL_CAPACITY: usize = 32;

struct Slot<T> {
    value: Option<T>,
    generation: u32,
}

/// A typed generational pool. `K` tags the [`Handle<K>`] kind this pool
/// hands out so cross-pool lookups are a type error, not a runtime bug.
pub struct Pool<T, K = T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live_count: usize,
    _marker: std::marker::PhantomData<fn() -> K>,
}

impl<T, K> Default for Pool<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K> Pool<T, K> {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(INITIAL_CAPACITY),
            free: Vec::new(),
            live_count: 0,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Growth policy: geometric doubling, starting at 32. Existing slot
    /// indices are untouched — `Vec::resize` only appends.
    fn grow(&mut self) {
        let new_cap = if self.slots.is_empty() {
            INITIAL_CAPACITY
        } else {
            self.slots.len() * 2
        };
        let start = self.slots.len();
        self.slots.reserve(new_cap - start);
        for i in start..new_cap {
            self.slots.push(Slot {
                value: None,
                generation: 0,
            });
            self.free.push(i as u32);
        }
    }

    /// Acquires a free slot and stores `value` in it, returning a handle
    /// whose generation matches the slot's current generation.
    ///
    /// Terminates the process with [`FatalError::PoolExhausted`] if the
    /// chosen slot's generation has wrapped past the 12-bit limit — the
    /// spec permits this as a contract-fatal, not a recoverable, condition.
    pub fn acquire(&mut self, value: T) -> Handle<K> {
        if self.free.is_empty() {
            self.grow();
        }
        let index = self.free.pop().expect("grow() guarantees a free slot");
        let slot = &mut self.slots[index as usize];
        if slot.generation > MAX_GENERATION {
            FatalError::PoolExhausted.terminate();
        }
        slot.value = Some(value);
        self.live_count += 1;
        Handle::pack(index, slot.generation)
    }

    /// Releases the slot a handle refers to, bumping its generation so any
    /// outstanding copy of `handle` becomes stale. A generation mismatch
    /// (already released, or handle from a different pool epoch) is a
    /// no-op — callers are allowed to check-and-ignore.
    pub fn release(&mut self, handle: Handle<K>) -> Option<T> {
        let index = handle.index() as usize;
        let slot = self.slots.get_mut(index)?;
        if slot.generation != handle.generation() || slot.value.is_none() {
            return None;
        }
        let value = slot.value.take();
        if slot.generation < MAX_GENERATION {
            slot.generation += 1;
        } else {
            // At the ceiling: leave the slot permanently retired rather
            // than wrapping, so a later acquire() trips PoolExhausted
            // instead of silently reusing generation 0.
            slot.generation = MAX_GENERATION + 1;
        }
        self.free.push(index as u32);
        self.live_count -= 1;
        value
    }

    pub fn access(&self, handle: Handle<K>) -> Option<&T> {
        let slot = self.slots.get(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn access_mut(&mut self, handle: Handle<K>) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn contains(&self, handle: Handle<K>) -> bool {
        self.access(handle).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|s| s.value.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|s| s.value.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag;
    type TestPool = Pool<u32, Tag>;

    #[test]
    fn acquire_then_access() {
        let mut pool = TestPool::new();
        let h = pool.acquire(7);
        assert_eq!(pool.access(h), Some(&7));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn release_invalidates_access() {
        let mut pool = TestPool::new();
        let h = pool.acquire(1);
        assert_eq!(pool.release(h), Some(1));
        assert_eq!(pool.access(h), None);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn generation_monotonicity() {
        let mut pool = TestPool::new();
        let h1 = pool.acquire(1);
        pool.release(h1);
        let h2 = pool.acquire(2);
        assert_eq!(h1.index(), h2.index());
        assert!(h2.generation() > h1.generation());
        // the stale handle no longer resolves
        assert_eq!(pool.access(h1), None);
        assert_eq!(pool.access(h2), Some(&2));
    }

    #[test]
    fn handle_stable_across_growth() {
        let mut pool = TestPool::new();
        let first = pool.acquire(0);
        // push well past the initial capacity of 32 to force growth
        let mut handles = vec![first];
        for i in 1..100u32 {
            handles.push(pool.acquire(i));
        }
        for (i, h) in handles.iter().enumerate() {
            assert_eq!(pool.access(*h), Some(&(i as u32)));
        }
    }

    #[test]
    fn pool_idempotence_sequence() {
        let mut pool = TestPool::new();
        let mut live = Vec::new();
        for i in 0..50u32 {
            live.push(pool.acquire(i));
            if i % 3 == 0 {
                if let Some(h) = live.pop() {
                    pool.release(h);
                }
            }
        }
        let expected_live = live.len();
        assert_eq!(pool.len(), expected_live);
        for h in &live {
            assert!(pool.access(*h).is_some());
        }
    }

    #[test]
    fn generation_climbs_to_the_wrap_boundary() {
        // Drive a single slot right up to (but not past) MAX_GENERATION;
        // the process-terminating path on the *next* acquire is exercised
        // only via the documented contract, not in-process, since it calls
        // std::process::exit.
        let mut pool = TestPool::new();
        let mut h = pool.acquire(0);
        for _ in 0..MAX_GENERATION {
            pool.release(h);
            h = pool.acquire(0);
        }
        assert_eq!(h.generation(), MAX_GENERATION);
        assert!(pool.access(h).is_some());
    }
}
