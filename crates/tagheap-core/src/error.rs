//! Recoverable allocation errors.
//!
//! Every variant is a local condition the caller may handle: retry after
//! freeing other blocks, shrink the request, or give up on it. Structural
//! corruption of the arena is not represented here; it is a programming
//! error and panics inside the arena crate.

use std::error::Error;
use std::fmt;

use crate::ptr::BlockPtr;

/// Errors returned by arena construction, `allocate` and `deallocate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The arena is too small for even one minimal block, or a single
    /// request exceeds the arena's total usable payload.
    Capacity {
        /// Number of bytes requested (or required, for construction).
        requested: usize,
        /// Number of bytes available.
        capacity: usize,
    },
    /// The request is valid in principle but no free block currently
    /// fits it.
    OutOfMemory {
        /// Number of payload bytes requested.
        requested: usize,
        /// Largest free payload found while scanning.
        largest_free: usize,
    },
    /// `deallocate` was handed a handle it cannot accept.
    InvalidArgument {
        /// The rejected handle.
        ptr: BlockPtr,
        /// Why the handle was rejected.
        reason: &'static str,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capacity {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::OutOfMemory {
                requested,
                largest_free,
            } => {
                write!(
                    f,
                    "out of arena memory: requested {requested} bytes, largest free block {largest_free} bytes"
                )
            }
            Self::InvalidArgument { ptr, reason } => {
                write!(f, "invalid block pointer {ptr}: {reason}")
            }
        }
    }
}

impl Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_capacity() {
        let err = AllocError::Capacity {
            requested: 600,
            capacity: 192,
        };
        assert_eq!(
            err.to_string(),
            "arena capacity exceeded: requested 600 bytes, capacity 192 bytes"
        );
    }

    #[test]
    fn display_invalid_argument_names_pointer() {
        let err = AllocError::InvalidArgument {
            ptr: BlockPtr::NULL,
            reason: "null pointer",
        };
        assert_eq!(err.to_string(), "invalid block pointer null: null pointer");
    }

    #[test]
    fn errors_are_std_errors() {
        fn takes_error(_: &dyn Error) {}
        takes_error(&AllocError::OutOfMemory {
            requested: 8,
            largest_free: 4,
        });
    }
}
