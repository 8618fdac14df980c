//! The boundary-tag arena allocator.
//!
//! [`Arena`] owns one fixed-size byte buffer and keeps every piece of
//! bookkeeping inside it. The buffer is always a gapless sequence of
//! `[header | payload | footer]` blocks (see [`crate::sentinel`] for the
//! tag encoding). Allocation is first-fit with in-place splitting;
//! deallocation eagerly merges with free neighbours so two free blocks are
//! never adjacent.
//!
//! Handles are byte offsets ([`BlockPtr`]), never references, so the
//! arena can be mutated freely while handles are outstanding.

use std::fmt;
use std::marker::PhantomData;

use log::{debug, trace};
use tagheap_core::{AllocError, BlockPtr, Element};

use crate::block::{BlockInfo, BlockState, Blocks};
use crate::config::ArenaConfig;
use crate::error::Corruption;
use crate::sentinel::{self, Sentinel, SENTINEL_WIDTH};
use crate::stats::ArenaStats;
use crate::validate;

/// Fixed-capacity first-fit allocator over an in-band free list.
///
/// Requests are counted in elements of `T`; the arena turns them into byte
/// extents of `n * T::SIZE`. Values move in and out of payloads through
/// [`construct`](Arena::construct), [`read`](Arena::read) and
/// [`destroy`](Arena::destroy).
///
/// All mutation takes `&mut self`. There is no internal synchronisation;
/// share an arena across threads only behind an external lock.
///
/// Any two arenas compare equal: allocators of this family are
/// interchangeable front-ends with no identity of their own.
pub struct Arena<T> {
    data: Box<[u8]>,
    config: ArenaConfig,
    _element: PhantomData<T>,
}

impl<T: Element> Arena<T> {
    /// Create a `capacity`-byte arena with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::Capacity`] if `capacity` cannot hold one
    /// element plus its two sentinels, or exceeds
    /// [`ArenaConfig::MAX_CAPACITY`].
    pub fn new(capacity: usize) -> Result<Self, AllocError> {
        Self::with_config(ArenaConfig::new(capacity))
    }

    /// Create an arena from an explicit configuration.
    ///
    /// The whole buffer becomes one free block of
    /// `capacity - 2 * SENTINEL_WIDTH` payload bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Arena::new`].
    pub fn with_config(config: ArenaConfig) -> Result<Self, AllocError> {
        const { assert!(T::SIZE > 0, "zero-sized elements cannot live in an arena") };

        let capacity = config.capacity;
        let minimum = ArenaConfig::min_capacity(T::SIZE);
        if capacity < minimum {
            debug!("rejecting {capacity}-byte arena: minimum is {minimum} bytes");
            return Err(AllocError::Capacity {
                requested: minimum,
                capacity,
            });
        }
        if capacity > ArenaConfig::MAX_CAPACITY {
            debug!("rejecting {capacity}-byte arena: payload would overflow sentinels");
            return Err(AllocError::Capacity {
                requested: capacity,
                capacity: ArenaConfig::MAX_CAPACITY,
            });
        }

        let mut arena = Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            config,
            _element: PhantomData,
        };
        let usable = arena.config.usable_bytes();
        arena.write_block(0, Sentinel::free(usable));
        debug!(
            "created {capacity}-byte arena: {usable} usable bytes, {}-byte elements",
            T::SIZE
        );
        arena.check();
        Ok(arena)
    }

    /// Reserve contiguous storage for `n` elements.
    ///
    /// Scans blocks from offset 0 and takes the first free block whose
    /// payload holds `n * T::SIZE` bytes. If what would remain after the
    /// request cannot host a block of its own (two sentinels plus one
    /// element), the whole block is handed out; otherwise the block is
    /// split and the tail stays free.
    ///
    /// # Errors
    ///
    /// - [`AllocError::Capacity`] if `n == 0` or `n` elements exceed the
    ///   arena's usable payload.
    /// - [`AllocError::OutOfMemory`] if no free block is large enough.
    pub fn allocate(&mut self, n: usize) -> Result<BlockPtr, AllocError> {
        let usable = self.usable_bytes();
        if n == 0 || n > usable / T::SIZE {
            debug!("rejecting allocate({n}): {usable} usable bytes");
            self.check();
            return Err(AllocError::Capacity {
                requested: n.saturating_mul(T::SIZE),
                capacity: usable,
            });
        }
        let need = n * T::SIZE;

        let mut largest_free = 0;
        let mut fit = None;
        for block in self.blocks() {
            trace!(
                "scan: {:?} block at {} with {} bytes",
                block.state,
                block.header,
                block.payload_len
            );
            if !block.is_free() {
                continue;
            }
            if block.payload_len >= need {
                fit = Some(block);
                break;
            }
            largest_free = largest_free.max(block.payload_len);
        }

        let Some(block) = fit else {
            debug!("allocate({n}): no free block holds {need} bytes (largest {largest_free})");
            self.check();
            return Err(AllocError::OutOfMemory {
                requested: need,
                largest_free,
            });
        };

        let ptr = self.place(block, need);
        self.check();
        Ok(ptr)
    }

    /// Return the block at `p` to the free list.
    ///
    /// The block is marked free and merged with its immediate left and
    /// right neighbours if they are free, in that order. `n` is the element
    /// count the block was requested with; it may be smaller than the block
    /// actually handed out, never larger.
    ///
    /// `p` is checked in O(1) before anything is written: it must lie in
    /// the arena, its header must be in use, and header and footer must
    /// agree. This rejects null, double frees and most stray pointers, but
    /// a forged pointer into a payload whose bytes mimic a matching in-use
    /// tag pair is still accepted and will corrupt the arena.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::InvalidArgument`] if `p` is rejected. The
    /// arena is left untouched.
    pub fn deallocate(&mut self, p: BlockPtr, n: usize) -> Result<(), AllocError> {
        let block = self.owned_block(p, n)?;
        let mut header = block.header;
        let mut len = block.payload_len;
        self.write_block(header, Sentinel::free(len));

        if header > 0 {
            let left = sentinel::read(&self.data, header - SENTINEL_WIDTH);
            if left.is_free() {
                header -= left.payload_len() + 2 * SENTINEL_WIDTH;
                len += left.payload_len() + 2 * SENTINEL_WIDTH;
                self.write_block(header, Sentinel::free(len));
                debug!("deallocate {p}: merged with free block at {header}");
            }
        }

        let right_header = header + len + 2 * SENTINEL_WIDTH;
        if right_header < self.data.len() {
            let right = sentinel::read(&self.data, right_header);
            if right.is_free() {
                len += right.payload_len() + 2 * SENTINEL_WIDTH;
                self.write_block(header, Sentinel::free(len));
                debug!("deallocate {p}: merged with free block at {right_header}");
            }
        }

        debug!("deallocate {p}: free block at {header} now holds {len} bytes");
        self.check();
        Ok(())
    }

    /// Write `value` into the element slot at `p`.
    ///
    /// Touches only payload bytes; block structure is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the slot runs past the end of the arena, or, when
    /// invariant checks are enabled, if it is not inside an in-use block.
    pub fn construct(&mut self, p: BlockPtr, value: T) {
        self.check_live_slot(p);
        value.write_bytes(self.slot_mut(p));
    }

    /// Read the element at `p` without changing it.
    ///
    /// # Panics
    ///
    /// Panics if the slot runs past the end of the arena.
    pub fn read(&self, p: BlockPtr) -> T {
        T::read_bytes(self.slot(p))
    }

    /// Tear down the element at `p`: move it out and zero its bytes.
    ///
    /// The caller receives the value and drops it. Block structure is
    /// unchanged.
    ///
    /// # Panics
    ///
    /// Same as [`construct`](Arena::construct).
    pub fn destroy(&mut self, p: BlockPtr) -> T {
        self.check_live_slot(p);
        let slot = self.slot_mut(p);
        let value = T::read_bytes(slot);
        slot.fill(0);
        value
    }

    /// Handle of the `index`-th element of the block starting at `p`.
    pub fn element(&self, p: BlockPtr, index: usize) -> BlockPtr {
        p.add_bytes(index * T::SIZE)
    }

    /// Total buffer size in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Payload bytes of the arena when it is one free block.
    pub fn usable_bytes(&self) -> usize {
        self.config.usable_bytes()
    }

    /// The configuration the arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Raw `i32` stored at byte `offset`.
    ///
    /// Introspection for tests: meaningful only at header and footer
    /// offsets.
    ///
    /// # Panics
    ///
    /// Panics if `offset + SENTINEL_WIDTH` exceeds the capacity.
    pub fn sentinel(&self, offset: usize) -> i32 {
        sentinel::read_raw(&self.data, offset)
    }

    /// Blocks in address order.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks::new(&self.data)
    }

    /// Occupancy summary.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats::collect(self.capacity(), self.blocks())
    }

    /// Run the structural validity walk.
    ///
    /// # Errors
    ///
    /// Returns the first [`Corruption`] found.
    pub fn validate(&self) -> Result<(), Corruption> {
        validate::validate(&self.data)
    }

    /// Whether the structural validity walk passes.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Carve `need` bytes out of the free `block` and mark them in use.
    fn place(&mut self, block: BlockInfo, need: usize) -> BlockPtr {
        let leftover = block
            .payload_len
            .checked_sub(need + 2 * SENTINEL_WIDTH)
            .filter(|&rest| rest >= T::SIZE);

        match leftover {
            None => {
                self.write_block(block.header, Sentinel::used(block.payload_len));
                debug!(
                    "allocate {need} bytes: took whole {}-byte block at {}",
                    block.payload_len, block.header
                );
            }
            Some(rest) => {
                self.write_block(block.header, Sentinel::used(need));
                let tail = block.header + need + 2 * SENTINEL_WIDTH;
                self.write_block(tail, Sentinel::free(rest));
                debug!(
                    "allocate {need} bytes: split block at {}, {rest} bytes left free at {tail}",
                    block.header
                );
            }
        }
        block.ptr()
    }

    /// Write `tag` as both header (at `header`) and matching footer.
    fn write_block(&mut self, header: usize, tag: Sentinel) {
        let footer = header + SENTINEL_WIDTH + tag.payload_len();
        sentinel::write(&mut self.data, header, tag);
        sentinel::write(&mut self.data, footer, tag);
    }

    /// Decode and vet the in-use block a caller is handing back.
    fn owned_block(&self, p: BlockPtr, n: usize) -> Result<BlockInfo, AllocError> {
        let reject = |reason: &'static str| {
            debug!("deallocate {p}: rejected, {reason}");
            AllocError::InvalidArgument { ptr: p, reason }
        };

        if p.is_null() {
            return Err(reject("null pointer"));
        }
        let offset = p.offset();
        if offset < SENTINEL_WIDTH || offset + SENTINEL_WIDTH > self.data.len() {
            return Err(reject("pointer outside arena"));
        }
        let header = offset - SENTINEL_WIDTH;
        let tag = sentinel::read(&self.data, header);
        if !tag.is_used() {
            return Err(reject("block is not in use"));
        }
        let len = tag.payload_len();
        let footer = offset + len;
        if footer + SENTINEL_WIDTH > self.data.len() || sentinel::read(&self.data, footer) != tag {
            return Err(reject("pointer does not start a block"));
        }
        if n.checked_mul(T::SIZE).is_none_or(|bytes| bytes > len) {
            return Err(reject("count exceeds block size"));
        }

        Ok(BlockInfo {
            header,
            payload_len: len,
            state: BlockState::Used,
        })
    }

    fn slot(&self, p: BlockPtr) -> &[u8] {
        &self.data[p.offset()..p.offset() + T::SIZE]
    }

    fn slot_mut(&mut self, p: BlockPtr) -> &mut [u8] {
        &mut self.data[p.offset()..p.offset() + T::SIZE]
    }

    fn check_live_slot(&self, p: BlockPtr) {
        if self.config.checks.enabled() {
            assert!(
                self.blocks()
                    .any(|b| b.state == BlockState::Used && b.contains(p.offset(), T::SIZE)),
                "element slot {p} is not inside an in-use block"
            );
        }
    }

    fn check(&self) {
        if self.config.checks.enabled() {
            if let Err(corruption) = self.validate() {
                panic!("arena invariant violated: {corruption}");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_sentinel(&mut self, offset: usize, raw: i32) {
        sentinel::write(&mut self.data, offset, Sentinel::from_raw(raw));
    }
}

impl<T> Clone for Arena<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            config: self.config.clone(),
            _element: PhantomData,
        }
    }
}

impl<T> PartialEq for Arena<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for Arena<T> {}

impl<T: Element> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("Arena")
            .field("capacity", &stats.capacity)
            .field("element_size", &T::SIZE)
            .field("used_blocks", &stats.used_blocks)
            .field("free_blocks", &stats.free_blocks)
            .field("free_bytes", &stats.free_bytes)
            .finish()
    }
}
