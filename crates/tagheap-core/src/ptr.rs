//! Payload handles.

use std::fmt;

/// Byte offset of a payload within an arena buffer.
///
/// A `BlockPtr` is what `allocate` hands out and what `deallocate` takes
/// back. It is a plain offset, not a reference: it carries no lifetime and
/// no ownership, and it means nothing once the arena that produced it is
/// dropped.
///
/// Offset 0 is never a valid payload (a header always precedes the first
/// payload byte), so [`BlockPtr::NULL`] doubles as the null handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPtr(pub usize);

impl BlockPtr {
    /// The null handle.
    pub const NULL: BlockPtr = BlockPtr(0);

    /// Whether this is the null handle.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Byte offset of the payload within the arena buffer.
    pub fn offset(self) -> usize {
        self.0
    }

    /// Handle `bytes` further into the arena.
    pub fn add_bytes(self, bytes: usize) -> Self {
        Self(self.0 + bytes)
    }
}

impl fmt::Display for BlockPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "@{}", self.0)
        }
    }
}

impl From<usize> for BlockPtr {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_offset_zero() {
        assert!(BlockPtr::NULL.is_null());
        assert!(!BlockPtr(4).is_null());
        assert_eq!(BlockPtr::NULL.to_string(), "null");
    }

    #[test]
    fn add_bytes_moves_forward() {
        let p = BlockPtr(4);
        assert_eq!(p.add_bytes(8), BlockPtr(12));
        assert_eq!(p.add_bytes(0), p);
    }

    #[test]
    fn display_shows_offset() {
        assert_eq!(BlockPtr(92).to_string(), "@92");
    }
}
