//! Block descriptors and the address-order block walk.
//!
//! A block is `[header | payload | footer]`. [`Blocks`] walks the arena
//! from offset 0, hopping `payload + 2 * SENTINEL_WIDTH` bytes at a time.
//! It is the single traversal used by first-fit search, statistics and
//! liveness checks.

use std::iter::FusedIterator;

use tagheap_core::BlockPtr;

use crate::sentinel::{self, SENTINEL_WIDTH};

/// Liveness of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockState {
    /// Available for allocation (positive sentinel).
    Free,
    /// Handed out by `allocate` (negative sentinel).
    Used,
}

/// Location and state of one block, decoded from its header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    /// Byte offset of the header sentinel.
    pub header: usize,
    /// Payload length in bytes.
    pub payload_len: usize,
    /// Free or in use.
    pub state: BlockState,
}

impl BlockInfo {
    /// Handle of the first payload byte.
    pub fn ptr(&self) -> BlockPtr {
        BlockPtr(self.header + SENTINEL_WIDTH)
    }

    /// Byte offset of the footer sentinel.
    pub fn footer(&self) -> usize {
        self.header + SENTINEL_WIDTH + self.payload_len
    }

    /// Byte offset one past the footer, where the next header starts.
    pub fn end(&self) -> usize {
        self.footer() + SENTINEL_WIDTH
    }

    /// Whether the block is free.
    pub fn is_free(&self) -> bool {
        self.state == BlockState::Free
    }

    /// Whether `[offset, offset + len)` lies inside this block's payload.
    pub fn contains(&self, offset: usize, len: usize) -> bool {
        offset >= self.ptr().offset() && offset + len <= self.footer()
    }
}

/// Iterator over the blocks of an arena buffer in address order.
///
/// The walk trusts headers. If it meets a header it cannot step over (zero
/// length, or a footer past the end of the buffer) it stops early; use
/// [`validate`](crate::validate::validate) to find out why.
pub struct Blocks<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl<'a> Blocks<'a> {
    /// Start a walk at offset 0 of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, cursor: 0 }
    }
}

impl Iterator for Blocks<'_> {
    type Item = BlockInfo;

    fn next(&mut self) -> Option<BlockInfo> {
        if self.cursor + 2 * SENTINEL_WIDTH > self.buf.len() {
            self.cursor = self.buf.len();
            return None;
        }
        let tag = sentinel::read(self.buf, self.cursor);
        let block = BlockInfo {
            header: self.cursor,
            payload_len: tag.payload_len(),
            state: if tag.is_free() {
                BlockState::Free
            } else {
                BlockState::Used
            },
        };
        if block.payload_len == 0 || block.end() > self.buf.len() {
            self.cursor = self.buf.len();
            return None;
        }
        self.cursor = block.end();
        Some(block)
    }
}

impl FusedIterator for Blocks<'_> {}
