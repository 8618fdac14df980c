//! Proptest strategies for allocator operation sequences.

use proptest::prelude::*;
use tagheap_arena::Arena;
use tagheap_core::Element;

use crate::shadow::ShadowHeap;

/// One step of an allocate/deallocate workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Allocate this many elements.
    Alloc(usize),
    /// Free the live allocation at this index (modulo the live count).
    Free(usize),
}

impl Op {
    /// Apply to `arena`, recording in `shadow`. Allocation failures are
    /// expected under pressure and are ignored.
    pub fn apply<T: Element>(self, arena: &mut Arena<T>, shadow: &mut ShadowHeap) {
        match self {
            Op::Alloc(n) => {
                let _ = shadow.allocate(arena, n);
            }
            Op::Free(index) => {
                shadow.free_nth(arena, index);
            }
        }
    }
}

/// Sequences of up to `max_len` ops requesting `1..=max_elements` at a time.
///
/// Allocations and frees are weighted equally so arenas oscillate between
/// fragmented and nearly empty.
pub fn arb_ops(max_elements: usize, max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        (1..=max_elements).prop_map(Op::Alloc),
        any::<usize>().prop_map(Op::Free),
    ];
    proptest::collection::vec(op, 0..max_len)
}
