//! Test utilities for tagheap development.
//!
//! - [`init_logging`] routes `log` output through `env_logger` in tests.
//! - [`layout`] and [`assert_well_formed`] inspect arena structure.
//! - [`ShadowHeap`] mirrors live allocations and cross-checks the arena.
//! - [`strategies`] generates allocate/deallocate sequences for proptest.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod shadow;
pub mod strategies;

pub use shadow::ShadowHeap;
pub use strategies::{arb_ops, Op};

use tagheap_arena::{Arena, BlockState, SENTINEL_WIDTH};
use tagheap_core::Element;

/// Install `env_logger` for the current test binary.
///
/// Safe to call from every test; only the first call installs a logger.
/// Set `RUST_LOG=tagheap_arena=trace` to see scan steps.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Signed payload lengths of every block, in address order.
///
/// Same sign convention as the sentinels: free blocks positive, in-use
/// blocks negative. A fresh 100-byte arena is `[92]`.
pub fn layout<T: Element>(arena: &Arena<T>) -> Vec<i32> {
    arena
        .blocks()
        .map(|b| {
            let len = b.payload_len as i32;
            match b.state {
                BlockState::Free => len,
                BlockState::Used => -len,
            }
        })
        .collect()
}

/// Assert every structural invariant, reading sentinels directly.
///
/// Checks the validity walk, then re-derives its facts from the raw
/// sentinels so a bug in the walk itself cannot hide a broken arena.
///
/// # Panics
///
/// Panics with a description of the first violated invariant.
pub fn assert_well_formed<T: Element>(arena: &Arena<T>) {
    if let Err(corruption) = arena.validate() {
        panic!("arena failed validation: {corruption}");
    }

    let mut offset = 0;
    let mut prev_free = false;
    while offset < arena.capacity() {
        let header = arena.sentinel(offset);
        assert_ne!(header, 0, "zero header at {offset}");
        let footer_at = offset + SENTINEL_WIDTH + header.unsigned_abs() as usize;
        let footer = arena.sentinel(footer_at);
        assert_eq!(header, footer, "header/footer mismatch for block at {offset}");
        assert!(
            !(prev_free && header > 0),
            "adjacent free blocks ending at {offset}"
        );
        prev_free = header > 0;
        offset = footer_at + SENTINEL_WIDTH;
    }
    assert_eq!(offset, arena.capacity(), "block walk overran the arena");

    let stats = arena.stats();
    assert_eq!(
        stats.used_bytes + stats.free_bytes + stats.overhead_bytes,
        stats.capacity,
        "byte accounting does not cover the arena"
    );
}
