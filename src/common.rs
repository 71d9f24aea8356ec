//! Common types: coordinates, shot outcomes and board errors.

use core::fmt;

use crate::bitboard::BitBoardError;

/// A cell coordinate as submitted by a client.
///
/// Signed so that negative input parses and is then classified as out of
/// range instead of being rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Board indices for a coordinate known to be non-negative.
    pub(crate) fn to_index(self) -> Option<(usize, usize)> {
        Some((usize::try_from(self.row).ok()?, usize::try_from(self.col).ok()?))
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        // Board sizes are bounded by MAX_BOARD_SIZE, far below i32::MAX.
        Coord::new(row as i32, col as i32)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Result of resolving one shot against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotOutcome {
    /// Coordinates fall outside the board.
    Invalid,
    /// Shot struck a ship cell.
    Hit,
    /// Shot struck open water (or, by policy, an already-resolved cell).
    Miss,
    /// Shot repeated an earlier one and the policy rejects repeats.
    Repeated,
}

/// Errors returned by board and placement operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Coordinates outside `[0, size)`.
    #[error("coordinates ({row}, {col}) are outside the board")]
    OutOfRange { row: i32, col: i32 },
    /// Board side length is zero or too large for the backing bitboard.
    #[error("board size {size} is not supported (1..={max})")]
    InvalidSize { size: usize, max: usize },
    /// Fleet cannot fit with at least one free cell left over.
    #[error("cannot place {ships} ships on a board of {cells} cells")]
    PlacementExhaustion { ships: usize, cells: usize },
    /// Underlying bitboard error.
    #[error("bitboard error: {0}")]
    BitBoard(#[from] BitBoardError),
}
