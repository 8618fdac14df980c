//! Structural corruption reports.
//!
//! A [`Corruption`] means the in-band metadata no longer describes a valid
//! partition of the buffer. It is a bug, not a recoverable condition: the
//! arena turns it into a panic when invariant checks are enabled. It is
//! exposed so tests and diagnostics can see exactly what went wrong.

use std::error::Error;
use std::fmt;

/// Structural invariant violations found by the validity walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Corruption {
    /// A header holds zero, so the walk cannot advance.
    ZeroSizedBlock {
        /// Offset of the offending header.
        header: usize,
    },
    /// A block (or its header) extends past the end of the buffer.
    Overrun {
        /// Offset of the offending header.
        header: usize,
        /// Buffer length in bytes.
        capacity: usize,
    },
    /// Header and footer of one block disagree.
    SentinelMismatch {
        /// Offset of the offending header.
        header: usize,
        /// Raw header value.
        header_value: i32,
        /// Raw footer value.
        footer_value: i32,
    },
    /// Two free blocks sit next to each other; the second starts here.
    AdjacentFree {
        /// Offset of the second free block's header.
        header: usize,
    },
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSizedBlock { header } => {
                write!(f, "zero-sized block at offset {header}")
            }
            Self::Overrun { header, capacity } => {
                write!(
                    f,
                    "block at offset {header} runs past the end of a {capacity}-byte arena"
                )
            }
            Self::SentinelMismatch {
                header,
                header_value,
                footer_value,
            } => {
                write!(
                    f,
                    "sentinel mismatch at offset {header}: header {header_value}, footer {footer_value}"
                )
            }
            Self::AdjacentFree { header } => {
                write!(f, "uncoalesced free block at offset {header}")
            }
        }
    }
}

impl Error for Corruption {}
