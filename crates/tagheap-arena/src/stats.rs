//! Occupancy summary.

use crate::block::BlockInfo;
use crate::sentinel::SENTINEL_WIDTH;

/// Point-in-time occupancy of an arena, gathered in one block walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Total buffer size in bytes.
    pub capacity: usize,
    /// Payload bytes in in-use blocks.
    pub used_bytes: usize,
    /// Payload bytes in free blocks.
    pub free_bytes: usize,
    /// Bytes spent on sentinels.
    pub overhead_bytes: usize,
    /// Number of in-use blocks.
    pub used_blocks: usize,
    /// Number of free blocks.
    pub free_blocks: usize,
    /// Largest free payload, i.e. the biggest request that can succeed.
    pub largest_free: usize,
}

impl ArenaStats {
    /// Summarise a block walk over a `capacity`-byte buffer.
    pub fn collect(capacity: usize, blocks: impl IntoIterator<Item = BlockInfo>) -> Self {
        let mut stats = Self {
            capacity,
            ..Self::default()
        };
        for block in blocks {
            stats.overhead_bytes += 2 * SENTINEL_WIDTH;
            if block.is_free() {
                stats.free_blocks += 1;
                stats.free_bytes += block.payload_len;
                stats.largest_free = stats.largest_free.max(block.payload_len);
            } else {
                stats.used_blocks += 1;
                stats.used_bytes += block.payload_len;
            }
        }
        stats
    }

    /// Share of free space not reachable by a single request.
    ///
    /// `0.0` when all free space is one block (or there is none); tends to
    /// `1.0` as free space splinters.
    pub fn fragmentation(&self) -> f64 {
        if self.free_bytes == 0 {
            return 0.0;
        }
        1.0 - self.largest_free as f64 / self.free_bytes as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockState;

    fn block(header: usize, payload_len: usize, state: BlockState) -> BlockInfo {
        BlockInfo {
            header,
            payload_len,
            state,
        }
    }

    #[test]
    fn collect_accounts_every_byte() {
        let stats = ArenaStats::collect(
            100,
            [
                block(0, 16, BlockState::Free),
                block(24, 20, BlockState::Used),
                block(52, 40, BlockState::Free),
            ],
        );
        assert_eq!(stats.free_blocks, 2);
        assert_eq!(stats.used_blocks, 1);
        assert_eq!(stats.free_bytes, 56);
        assert_eq!(stats.largest_free, 40);
        assert_eq!(
            stats.used_bytes + stats.free_bytes + stats.overhead_bytes,
            stats.capacity
        );
    }

    #[test]
    fn fragmentation_of_single_free_block_is_zero() {
        let stats = ArenaStats::collect(100, [block(0, 92, BlockState::Free)]);
        assert_eq!(stats.fragmentation(), 0.0);
    }

    #[test]
    fn fragmentation_with_no_free_space_is_zero() {
        let stats = ArenaStats::collect(100, [block(0, 92, BlockState::Used)]);
        assert_eq!(stats.fragmentation(), 0.0);
    }

    #[test]
    fn fragmentation_grows_with_splintering() {
        let stats = ArenaStats::collect(
            100,
            [
                block(0, 20, BlockState::Free),
                block(28, 20, BlockState::Used),
                block(56, 36, BlockState::Free),
            ],
        );
        let expected = 1.0 - 36.0 / 56.0;
        assert!((stats.fragmentation() - expected).abs() < 1e-12);
    }
}
