//! The structural validity walk.
//!
//! Unlike [`Blocks`](crate::block::Blocks), which stops quietly on a
//! malformed header, this walk reports the first violation it finds.

use crate::error::Corruption;
use crate::sentinel::{self, SENTINEL_WIDTH};

/// Check that `buf` is a well-formed arena.
///
/// Walks from offset 0 and verifies, for every block, that its header is
/// nonzero, that its footer lies inside the buffer and equals the header,
/// and that no two free blocks are adjacent. The walk must land exactly on
/// the end of the buffer.
pub fn validate(buf: &[u8]) -> Result<(), Corruption> {
    let capacity = buf.len();
    let mut header = 0;
    let mut prev_free = false;

    while header < capacity {
        if header + 2 * SENTINEL_WIDTH > capacity {
            return Err(Corruption::Overrun { header, capacity });
        }
        let tag = sentinel::read(buf, header);
        let len = tag.payload_len();
        if len == 0 {
            return Err(Corruption::ZeroSizedBlock { header });
        }
        let footer = match (header + SENTINEL_WIDTH).checked_add(len) {
            Some(footer) if footer + SENTINEL_WIDTH <= capacity => footer,
            _ => return Err(Corruption::Overrun { header, capacity }),
        };
        let footer_tag = sentinel::read(buf, footer);
        if footer_tag != tag {
            return Err(Corruption::SentinelMismatch {
                header,
                header_value: tag.raw(),
                footer_value: footer_tag.raw(),
            });
        }
        if tag.is_free() && prev_free {
            return Err(Corruption::AdjacentFree { header });
        }
        prev_free = tag.is_free();
        header = footer + SENTINEL_WIDTH;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::{write, Sentinel};

    fn put_raw(buf: &mut [u8], offset: usize, raw: i32) {
        write(buf, offset, Sentinel::from_raw(raw));
    }

    #[test]
    fn single_free_block_is_valid() {
        let mut buf = vec![0u8; 50];
        put_raw(&mut buf, 0, 42);
        put_raw(&mut buf, 46, 42);
        assert_eq!(validate(&buf), Ok(()));
    }

    #[test]
    fn hand_built_free_then_used_is_valid() {
        let mut buf = vec![0u8; 100];
        put_raw(&mut buf, 0, 32);
        put_raw(&mut buf, 36, 32);
        put_raw(&mut buf, 40, -52);
        put_raw(&mut buf, 96, -52);
        assert_eq!(validate(&buf), Ok(()));
    }

    #[test]
    fn mismatched_sign_is_reported() {
        let mut buf = vec![0u8; 100];
        put_raw(&mut buf, 0, -92);
        put_raw(&mut buf, 96, 92);
        assert_eq!(
            validate(&buf),
            Err(Corruption::SentinelMismatch {
                header: 0,
                header_value: -92,
                footer_value: 92,
            })
        );
    }

    #[test]
    fn adjacent_free_blocks_are_reported() {
        let mut buf = vec![0u8; 100];
        put_raw(&mut buf, 0, 32);
        put_raw(&mut buf, 36, 32);
        put_raw(&mut buf, 40, 52);
        put_raw(&mut buf, 96, 52);
        assert_eq!(validate(&buf), Err(Corruption::AdjacentFree { header: 40 }));
    }

    #[test]
    fn zero_header_is_reported() {
        let buf = vec![0u8; 16];
        assert_eq!(validate(&buf), Err(Corruption::ZeroSizedBlock { header: 0 }));
    }

    #[test]
    fn header_past_end_is_reported() {
        let mut buf = vec![0u8; 16];
        put_raw(&mut buf, 0, 12);
        assert_eq!(
            validate(&buf),
            Err(Corruption::Overrun {
                header: 0,
                capacity: 16
            })
        );
    }

    #[test]
    fn trailing_bytes_too_short_for_a_block_are_reported() {
        let mut buf = vec![0u8; 20];
        put_raw(&mut buf, 0, 8);
        put_raw(&mut buf, 12, 8);
        assert_eq!(
            validate(&buf),
            Err(Corruption::Overrun {
                header: 16,
                capacity: 20
            })
        );
    }
}
