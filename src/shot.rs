//! Shot validation and resolution.

use crate::board::{Board, Cell};
use crate::common::{Coord, ShotOutcome};

/// What to do with a shot at a cell that was already hit or missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(clap::ValueEnum))]
pub enum RepeatShotPolicy {
    /// Answer as a miss; the board and remaining count are left untouched.
    #[default]
    #[cfg_attr(feature = "std", value(name = "miss"))]
    ResolveAsMiss,
    /// Answer with [`ShotOutcome::Repeated`].
    Reject,
}

/// Resolve a shot at `at`, mutating `board` for first-time hits and misses.
///
/// A `Hit` turns the cell from `Ship` to `Hit`, which is what lowers
/// [`Board::remaining_ship_cells`] by exactly one.
pub fn resolve_shot(board: &mut Board, at: Coord, policy: RepeatShotPolicy) -> ShotOutcome {
    let Ok(cell) = board.cell_state(at) else {
        return ShotOutcome::Invalid;
    };
    let marked = match cell {
        Cell::Ship => board.mark_hit(at).map(|()| ShotOutcome::Hit),
        Cell::Empty => board.mark_miss(at).map(|()| ShotOutcome::Miss),
        Cell::Hit | Cell::Miss => Ok(match policy {
            RepeatShotPolicy::ResolveAsMiss => ShotOutcome::Miss,
            RepeatShotPolicy::Reject => ShotOutcome::Repeated,
        }),
    };
    // cell_state already validated the coordinates
    marked.unwrap_or(ShotOutcome::Invalid)
}
