//! Core types and traits for the tagheap allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the arena and its callers: the [`BlockPtr`]
//! payload handle, the [`Element`] encoding trait, and the recoverable
//! [`AllocError`] taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod error;
pub mod ptr;

pub use element::Element;
pub use error::AllocError;
pub use ptr::BlockPtr;
