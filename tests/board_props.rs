use std::collections::HashSet;

use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};
use sinkfleet::{
    place_fleet, resolve_shot, Board, Cell, Coord, RepeatShotPolicy, ShotOutcome, MAX_BOARD_SIZE,
};

fn placed_board(seed: u64, size: usize, ships: usize) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut board = Board::new(size).unwrap();
    place_fleet(&mut board, ships, &mut rng).unwrap();
    board
}

/// Board size and a ship count that leaves at least one free cell.
fn size_and_ships() -> impl Strategy<Value = (usize, usize)> {
    (1..=MAX_BOARD_SIZE)
        .prop_filter("needs a free cell", |n| n * n > 1)
        .prop_flat_map(|n| (Just(n), 1..n * n))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn placement_marks_exactly_k_distinct_cells(seed in any::<u64>(), (size, ships) in size_and_ships()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::new(size).unwrap();
        let placed = place_fleet(&mut board, ships, &mut rng).unwrap();

        prop_assert_eq!(board.remaining_ship_cells(), ships);
        let distinct: HashSet<_> = placed.iter().copied().collect();
        prop_assert_eq!(distinct.len(), ships);
        let on_board: HashSet<_> = board.ship_cells().collect();
        prop_assert_eq!(on_board, distinct);
    }

    #[test]
    fn out_of_bounds_shot_is_invalid_and_leaves_board(
        seed in any::<u64>(),
        row in -20i32..20,
        col in -20i32..20,
    ) {
        let mut board = placed_board(seed, 5, 3);
        prop_assume!(!(0..5).contains(&row) || !(0..5).contains(&col));
        let before = board;
        let outcome = resolve_shot(&mut board, Coord::new(row, col), RepeatShotPolicy::ResolveAsMiss);
        prop_assert_eq!(outcome, ShotOutcome::Invalid);
        prop_assert_eq!(board, before);
    }

    #[test]
    fn shot_on_ship_hits_once(seed in any::<u64>(), pick in 0usize..3) {
        let mut board = placed_board(seed, 5, 3);
        let target = board.ship_cells().nth(pick).unwrap();
        let before = board.remaining_ship_cells();

        let outcome = resolve_shot(&mut board, target, RepeatShotPolicy::ResolveAsMiss);
        prop_assert_eq!(outcome, ShotOutcome::Hit);
        prop_assert_eq!(board.remaining_ship_cells(), before - 1);
        prop_assert_eq!(board.cell_state(target).unwrap(), Cell::Hit);
    }

    #[test]
    fn shot_on_water_misses(seed in any::<u64>(), row in 0i32..5, col in 0i32..5) {
        let mut board = placed_board(seed, 5, 3);
        let at = Coord::new(row, col);
        prop_assume!(board.cell_state(at).unwrap() == Cell::Empty);

        let outcome = resolve_shot(&mut board, at, RepeatShotPolicy::ResolveAsMiss);
        prop_assert_eq!(outcome, ShotOutcome::Miss);
        prop_assert_eq!(board.cell_state(at).unwrap(), Cell::Miss);
        prop_assert_eq!(board.remaining_ship_cells(), 3);
    }
}
