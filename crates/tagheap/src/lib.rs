//! tagheap: a fixed-capacity arena allocator with in-band boundary tags.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the tagheap sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use tagheap::prelude::*;
//!
//! // 100 bytes of arena, counted in i32 elements.
//! let mut arena = Arena::<i32>::new(100).unwrap();
//!
//! let p = arena.allocate(20).unwrap();
//! for i in 0..20 {
//!     arena.construct(arena.element(p, i), i as i32);
//! }
//! assert_eq!(arena.read(arena.element(p, 7)), 7);
//!
//! // 20 ints = 80 bytes in use; 4 bytes left free after the split.
//! assert_eq!(arena.sentinel(0), -80);
//!
//! for i in (0..20).rev() {
//!     arena.destroy(arena.element(p, i));
//! }
//! arena.deallocate(p, 20).unwrap();
//!
//! // Back to one free block of 100 - 2 * 4 bytes.
//! assert_eq!(arena.sentinel(0), 92);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `tagheap-arena` | `Arena`, configuration, block walk, validation, stats |
//! | [`types`] | `tagheap-core` | `BlockPtr`, `Element`, `AllocError` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Arena allocator, configuration and diagnostics (`tagheap-arena`).
pub use tagheap_arena as arena;

/// Handles, element encoding and errors (`tagheap-core`).
pub use tagheap_core as types;

/// Common imports for arena users.
pub mod prelude {
    pub use tagheap_arena::{Arena, ArenaConfig, ArenaStats, InvariantChecks};
    pub use tagheap_core::{AllocError, BlockPtr, Element};
}
