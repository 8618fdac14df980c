//! Property tests over random allocate/deallocate sequences.

use proptest::prelude::*;
use tagheap_arena::{Arena, ArenaConfig, BlockState, InvariantChecks};
use tagheap_core::AllocError;
use tagheap_test_utils::{arb_ops, assert_well_formed, layout, ShadowHeap};

fn checked_arena(capacity: usize) -> Arena<i32> {
    Arena::with_config(ArenaConfig::new(capacity).with_checks(InvariantChecks::Always)).unwrap()
}

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(
        capacity in 12usize..512,
        ops in arb_ops(24, 64),
    ) {
        let mut arena = checked_arena(capacity);
        let mut shadow = ShadowHeap::new();
        for op in ops {
            op.apply(&mut arena, &mut shadow);
            assert_well_formed(&arena);
            shadow.check(&arena);
        }
    }

    #[test]
    fn no_two_free_blocks_are_adjacent(
        ops in arb_ops(16, 96),
    ) {
        let mut arena = checked_arena(400);
        let mut shadow = ShadowHeap::new();
        for op in ops {
            op.apply(&mut arena, &mut shadow);
            let states: Vec<_> = arena.blocks().map(|b| b.state).collect();
            prop_assert!(
                !states
                    .windows(2)
                    .any(|w| w[0] == BlockState::Free && w[1] == BlockState::Free),
                "adjacent free blocks in {:?}",
                layout(&arena)
            );
        }
    }

    #[test]
    fn header_equals_footer_for_every_block(
        ops in arb_ops(16, 64),
    ) {
        let mut arena = checked_arena(300);
        let mut shadow = ShadowHeap::new();
        for op in ops {
            op.apply(&mut arena, &mut shadow);
            for block in arena.blocks() {
                prop_assert_eq!(arena.sentinel(block.header), arena.sentinel(block.footer()));
            }
        }
    }

    #[test]
    fn single_allocate_free_round_trips(
        capacity in 12usize..1024,
        n in 1usize..256,
    ) {
        let mut arena = checked_arena(capacity);
        let usable = capacity as i32 - 8;
        match arena.allocate(n) {
            Ok(p) => {
                arena.deallocate(p, n).unwrap();
                prop_assert_eq!(layout(&arena), vec![usable]);
            }
            Err(AllocError::Capacity { .. }) => prop_assert!(n * 4 > usable as usize),
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn freeing_everything_restores_one_free_block(
        capacity in 12usize..512,
        ops in arb_ops(24, 64),
    ) {
        let mut arena = checked_arena(capacity);
        let mut shadow = ShadowHeap::new();
        for op in ops {
            op.apply(&mut arena, &mut shadow);
        }
        shadow.drain(&mut arena);
        prop_assert_eq!(layout(&arena), vec![capacity as i32 - 8]);
    }

    #[test]
    fn allocation_picks_first_free_block_that_fits(
        ops in arb_ops(12, 48),
        n in 1usize..12,
    ) {
        let mut arena = checked_arena(400);
        let mut shadow = ShadowHeap::new();
        for op in ops {
            op.apply(&mut arena, &mut shadow);
        }
        let need = n * 4;
        let expected = arena
            .blocks()
            .find(|b| b.state == BlockState::Free && b.payload_len >= need)
            .map(|b| b.ptr());
        match arena.allocate(n) {
            Ok(p) => prop_assert_eq!(Some(p), expected),
            Err(AllocError::OutOfMemory { largest_free, .. }) => {
                prop_assert_eq!(expected, None);
                prop_assert!(largest_free < need);
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn oversize_requests_always_fail(
        capacity in 12usize..512,
        extra in 1usize..64,
    ) {
        let mut arena = checked_arena(capacity);
        let too_many = (capacity - 8) / 4 + extra;
        let is_capacity_error = matches!(arena.allocate(too_many), Err(AllocError::Capacity { .. }));
        prop_assert!(is_capacity_error);
        let is_zero_error = matches!(arena.allocate(0), Err(AllocError::Capacity { .. }));
        prop_assert!(is_zero_error);
    }
}
