//! Benchmark workloads for the tagheap allocator.
//!
//! Builders here produce arenas in reproducible states so benchmarks
//! measure the operation under test rather than setup.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tagheap_arena::{Arena, ArenaConfig, InvariantChecks};
use tagheap_core::BlockPtr;

/// One step of a replayable workload.
#[derive(Clone, Copy, Debug)]
pub enum Step {
    /// Allocate this many elements.
    Alloc(usize),
    /// Free the live block at this index (modulo the live count).
    Free(usize),
}

/// An arena with invariant checks off, so timings exclude the validity walk.
pub fn unchecked_arena(capacity: usize) -> Arena<u64> {
    Arena::with_config(ArenaConfig::new(capacity).with_checks(InvariantChecks::Never))
        .expect("benchmark capacity holds at least one element")
}

/// An arena alternating `holes` one-element free holes with used blocks,
/// followed by one large free tail.
///
/// A request for two or more elements has to walk past every hole before
/// it reaches the tail: the worst case for first-fit.
pub fn fragmented_arena(capacity: usize, holes: usize) -> Arena<u64> {
    let mut arena = unchecked_arena(capacity);
    let mut to_free = Vec::with_capacity(holes);
    for _ in 0..holes {
        to_free.push(arena.allocate(1).expect("arena sized for holes"));
        arena.allocate(1).expect("arena sized for holes");
    }
    for p in to_free {
        arena.deallocate(p, 1).expect("freshly allocated");
    }
    arena
}

/// `len` seeded allocate/free steps requesting `1..=max_elements`.
pub fn churn_steps(seed: u64, len: usize, max_elements: usize) -> Vec<Step> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            if rng.gen_bool(0.5) {
                Step::Alloc(rng.gen_range(1..=max_elements))
            } else {
                Step::Free(rng.gen::<usize>())
            }
        })
        .collect()
}

/// Replay `steps` against `arena`, ignoring allocation failures.
///
/// Returns the number of blocks still live at the end.
pub fn replay(arena: &mut Arena<u64>, steps: &[Step]) -> usize {
    let mut live: Vec<(BlockPtr, usize)> = Vec::new();
    for &step in steps {
        match step {
            Step::Alloc(n) => {
                if let Ok(p) = arena.allocate(n) {
                    live.push((p, n));
                }
            }
            Step::Free(i) if !live.is_empty() => {
                let (p, n) = live.swap_remove(i % live.len());
                let _ = arena.deallocate(p, n);
            }
            Step::Free(_) => {}
        }
    }
    live.len()
}
