//! Fixed-capacity arena allocation with in-band boundary tags.
//!
//! One [`Arena`] owns one byte buffer and stores all of its metadata in
//! that buffer. There is no side table and no backing allocator after
//! construction.
//!
//! # Layout
//!
//! ```text
//! offset 0                                                  capacity
//! ├─ hdr ─┬──── payload ────┬─ ftr ─┬─ hdr ─┬─ payload ─┬─ ftr ─┤
//! │  -80  │   80 bytes      │  -80  │   4   │  4 bytes  │   4   │
//! └───────┴─────────────────┴───────┴───────┴───────────┴───────┘
//!           in use                            free
//! ```
//!
//! Each sentinel is an `i32`: magnitude is the payload length, sign is the
//! liveness bit (negative = in use). Blocks tile the buffer exactly, every
//! header equals its footer, and no two free blocks are ever adjacent.
//!
//! # Operations
//!
//! - **allocate:** first-fit scan; split unless the remainder could not
//!   hold a block of its own.
//! - **deallocate:** flip to free, then merge with the left and right
//!   neighbours if they are free.
//! - **construct / read / destroy:** copy element values in and out of
//!   payloads through [`tagheap_core::Element`].
//!
//! The crate contains no `unsafe`: the buffer is a `Box<[u8]>` and every
//! access is a bounds-checked slice.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod block;
pub mod config;
pub mod error;
pub mod sentinel;
pub mod stats;
pub mod validate;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use block::{BlockInfo, BlockState, Blocks};
pub use config::{ArenaConfig, InvariantChecks};
pub use error::Corruption;
pub use sentinel::SENTINEL_WIDTH;
pub use stats::ArenaStats;
