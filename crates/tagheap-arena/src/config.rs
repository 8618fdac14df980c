//! Arena configuration parameters.

use crate::sentinel::SENTINEL_WIDTH;

/// When the full structural validity walk runs.
///
/// The walk is O(arena size) and runs after every `allocate` and
/// `deallocate` (and on construction) when enabled. A failed walk panics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InvariantChecks {
    /// Only in builds with `debug_assertions`.
    #[default]
    DebugOnly,
    /// In every build.
    Always,
    /// Never. `validate()` can still be called explicitly.
    Never,
}

impl InvariantChecks {
    /// Whether checks run in the current build.
    pub fn enabled(self) -> bool {
        match self {
            Self::DebugOnly => cfg!(debug_assertions),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Configuration for an arena.
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Total buffer size in bytes, sentinels included.
    ///
    /// Must be at least one element plus two sentinels, and the usable
    /// payload (`capacity - 2 * SENTINEL_WIDTH`) must fit in an `i32`.
    pub capacity: usize,

    /// When to run the validity walk after mutations.
    pub checks: InvariantChecks,
}

impl ArenaConfig {
    /// Largest buffer whose usable payload still fits in a sentinel.
    pub const MAX_CAPACITY: usize = i32::MAX as usize + 2 * SENTINEL_WIDTH;

    /// Create a config for a `capacity`-byte arena with default checks.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            checks: InvariantChecks::default(),
        }
    }

    /// Set the invariant-check policy.
    pub fn with_checks(mut self, checks: InvariantChecks) -> Self {
        self.checks = checks;
        self
    }

    /// Payload bytes of the initial single free block.
    pub fn usable_bytes(&self) -> usize {
        self.capacity.saturating_sub(2 * SENTINEL_WIDTH)
    }

    /// Smallest capacity that can hold one element of `element_size` bytes.
    pub fn min_capacity(element_size: usize) -> usize {
        element_size + 2 * SENTINEL_WIDTH
    }
}
