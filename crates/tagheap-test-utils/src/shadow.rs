//! Shadow model of live allocations.
//!
//! [`ShadowHeap`] drives an arena and remembers every handle it has been
//! given, in allocation order. [`ShadowHeap::check`] then verifies the
//! arena agrees: each live handle sits at the start of a distinct in-use
//! block big enough for its request, and nothing else is in use.

use indexmap::IndexMap;
use log::trace;
use tagheap_arena::{Arena, BlockState};
use tagheap_core::{AllocError, BlockPtr, Element};

/// Live allocations as the caller sees them.
#[derive(Debug, Default)]
pub struct ShadowHeap {
    /// Handle -> element count requested.
    live: IndexMap<BlockPtr, usize>,
}

impl ShadowHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `n` elements and record the handle on success.
    pub fn allocate<T: Element>(
        &mut self,
        arena: &mut Arena<T>,
        n: usize,
    ) -> Result<BlockPtr, AllocError> {
        let ptr = arena.allocate(n)?;
        let previous = self.live.insert(ptr, n);
        assert!(previous.is_none(), "arena handed out live handle {ptr} twice");
        trace!("shadow: allocated {n} at {ptr}");
        Ok(ptr)
    }

    /// Free the `index`-th live allocation (modulo the live count).
    ///
    /// Returns the freed handle, or `None` if nothing is live.
    pub fn free_nth<T: Element>(&mut self, arena: &mut Arena<T>, index: usize) -> Option<BlockPtr> {
        if self.live.is_empty() {
            return None;
        }
        let (ptr, n) = self.live.shift_remove_index(index % self.live.len())?;
        if let Err(err) = arena.deallocate(ptr, n) {
            panic!("deallocating live handle {ptr}: {err}");
        }
        trace!("shadow: freed {n} at {ptr}");
        Some(ptr)
    }

    /// Free everything still live, oldest first.
    pub fn drain<T: Element>(&mut self, arena: &mut Arena<T>) {
        while self.free_nth(arena, 0).is_some() {}
    }

    pub fn live(&self) -> impl Iterator<Item = (BlockPtr, usize)> + '_ {
        self.live.iter().map(|(&ptr, &n)| (ptr, n))
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Assert the arena's in-use blocks are exactly the live handles.
    ///
    /// # Panics
    ///
    /// Panics on the first disagreement.
    pub fn check<T: Element>(&self, arena: &Arena<T>) {
        let used: Vec<_> = arena
            .blocks()
            .filter(|b| b.state == BlockState::Used)
            .collect();
        assert_eq!(
            used.len(),
            self.live.len(),
            "arena has {} in-use blocks, shadow has {} live handles",
            used.len(),
            self.live.len()
        );
        for (&ptr, &n) in &self.live {
            let block = used
                .iter()
                .find(|b| b.ptr() == ptr)
                .unwrap_or_else(|| panic!("live handle {ptr} does not start an in-use block"));
            assert!(
                block.payload_len >= n * T::SIZE,
                "block at {ptr} holds {} bytes, {n} elements need {}",
                block.payload_len,
                n * T::SIZE
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_allocate_and_free() {
        let mut arena = Arena::<i32>::new(100).unwrap();
        let mut shadow = ShadowHeap::new();
        let a = shadow.allocate(&mut arena, 3).unwrap();
        let b = shadow.allocate(&mut arena, 2).unwrap();
        shadow.check(&arena);
        assert_eq!(shadow.live_count(), 2);

        assert_eq!(shadow.free_nth(&mut arena, 0), Some(a));
        shadow.check(&arena);
        assert_eq!(shadow.live().collect::<Vec<_>>(), vec![(b, 2)]);

        shadow.drain(&mut arena);
        shadow.check(&arena);
        assert_eq!(shadow.free_nth(&mut arena, 5), None);
    }

    #[test]
    fn failed_allocation_is_not_recorded() {
        let mut arena = Arena::<i32>::new(100).unwrap();
        let mut shadow = ShadowHeap::new();
        assert!(shadow.allocate(&mut arena, 100).is_err());
        assert_eq!(shadow.live_count(), 0);
    }

    #[test]
    #[should_panic(expected = "in-use blocks")]
    fn check_catches_untracked_block() {
        let mut arena = Arena::<i32>::new(100).unwrap();
        let shadow = ShadowHeap::new();
        arena.allocate(1).unwrap();
        shadow.check(&arena);
    }
}
