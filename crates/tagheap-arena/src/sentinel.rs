//! Boundary tags.
//!
//! Every block is bracketed by two copies of the same signed `i32`: the
//! magnitude is the payload length in bytes, the sign is the liveness bit
//! (positive = free, negative = in use). Zero never appears in a
//! well-formed arena.
//!
//! Sentinels are stored in native byte order at arbitrary byte offsets;
//! the arena guarantees no alignment beyond what the layout arithmetic
//! happens to produce.

/// Width in bytes of one sentinel.
pub const SENTINEL_WIDTH: usize = std::mem::size_of::<i32>();

/// Decoded boundary tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sentinel(i32);

impl Sentinel {
    /// Tag for a free block with `len` payload bytes.
    pub fn free(len: usize) -> Self {
        Self(Self::magnitude(len))
    }

    /// Tag for an in-use block with `len` payload bytes.
    pub fn used(len: usize) -> Self {
        Self(-Self::magnitude(len))
    }

    /// Wrap a raw value read from the arena.
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw stored value.
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Positive tags mark free blocks.
    pub fn is_free(self) -> bool {
        self.0 > 0
    }

    /// Negative tags mark in-use blocks.
    pub fn is_used(self) -> bool {
        self.0 < 0
    }

    /// Payload length in bytes.
    pub fn payload_len(self) -> usize {
        self.0.unsigned_abs() as usize
    }

    fn magnitude(len: usize) -> i32 {
        // Construction rejects arenas whose usable payload exceeds i32::MAX.
        debug_assert!(len <= i32::MAX as usize, "payload length {len} overflows sentinel");
        len as i32
    }
}

/// Read the sentinel stored at `offset`.
///
/// # Panics
///
/// Panics if `offset + SENTINEL_WIDTH` exceeds `buf.len()`.
pub(crate) fn read(buf: &[u8], offset: usize) -> Sentinel {
    Sentinel(read_raw(buf, offset))
}

/// Store `sentinel` at `offset`.
///
/// # Panics
///
/// Panics if `offset + SENTINEL_WIDTH` exceeds `buf.len()`.
pub(crate) fn write(buf: &mut [u8], offset: usize, sentinel: Sentinel) {
    buf[offset..offset + SENTINEL_WIDTH].copy_from_slice(&sentinel.0.to_ne_bytes());
}

pub(crate) fn read_raw(buf: &[u8], offset: usize) -> i32 {
    let mut bytes = [0u8; SENTINEL_WIDTH];
    bytes.copy_from_slice(&buf[offset..offset + SENTINEL_WIDTH]);
    i32::from_ne_bytes(bytes)
}
