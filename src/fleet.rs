//! Random fleet placement.

use alloc::vec::Vec;
use rand::Rng;

use crate::board::{Board, Cell};
use crate::common::{BoardError, Coord};

/// Mark `ship_count` distinct, uniformly random cells of `board` as ships.
///
/// Draws are rejected and redrawn while they land on a cell that already
/// holds a ship, so ships never share a cell but may touch. Fails with
/// `PlacementExhaustion` unless at least one cell stays free, which keeps
/// the rejection loop terminating. Returns the cells in placement order.
pub fn place_fleet<R: Rng>(
    board: &mut Board,
    ship_count: usize,
    rng: &mut R,
) -> Result<Vec<Coord>, BoardError> {
    let cells = board.cell_count();
    if ship_count >= cells {
        return Err(BoardError::PlacementExhaustion {
            ships: ship_count,
            cells,
        });
    }

    let size = board.size();
    let mut placed = Vec::with_capacity(ship_count);
    while placed.len() < ship_count {
        let at = Coord::from((rng.random_range(0..size), rng.random_range(0..size)));
        if board.cell_state(at)? == Cell::Ship {
            continue;
        }
        board.mark_ship(at)?;
        placed.push(at);
    }
    Ok(placed)
}
