//! Game board: ship occupancy and shot history on a square grid.

use core::fmt;

use crate::bitboard::BitBoard;
use crate::common::{BoardError, Coord};
use crate::config::MAX_BOARD_SIZE;

type BB = BitBoard<u128>;

/// State of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    Empty,
    Ship,
    Hit,
    Miss,
}

/// An `size×size` grid. Each cell is in exactly one of the [`Cell`] states;
/// the three masks below are kept disjoint.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    size: usize,
    ships: BB,
    hits: BB,
    misses: BB,
}

impl Board {
    /// Create a board with every cell empty.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(BoardError::InvalidSize {
                size,
                max: MAX_BOARD_SIZE,
            });
        }
        let empty = BB::try_new(size)?;
        Ok(Board {
            size,
            ships: empty,
            hits: empty,
            misses: empty,
        })
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    pub fn is_in_bounds(&self, at: Coord) -> bool {
        self.index(at).is_some()
    }

    /// Current state of the cell at `at`.
    pub fn cell_state(&self, at: Coord) -> Result<Cell, BoardError> {
        let (r, c) = self.checked_index(at)?;
        let cell = if self.hits.get(r, c)? {
            Cell::Hit
        } else if self.misses.get(r, c)? {
            Cell::Miss
        } else if self.ships.get(r, c)? {
            Cell::Ship
        } else {
            Cell::Empty
        };
        Ok(cell)
    }

    pub fn mark_ship(&mut self, at: Coord) -> Result<(), BoardError> {
        self.mark(at, Cell::Ship)
    }

    pub fn mark_hit(&mut self, at: Coord) -> Result<(), BoardError> {
        self.mark(at, Cell::Hit)
    }

    pub fn mark_miss(&mut self, at: Coord) -> Result<(), BoardError> {
        self.mark(at, Cell::Miss)
    }

    /// Number of cells still in the `Ship` state.
    pub fn remaining_ship_cells(&self) -> usize {
        self.ships.count_ones()
    }

    /// Number of cells that have been shot at.
    pub fn shots_taken(&self) -> usize {
        self.hits.count_ones() + self.misses.count_ones()
    }

    /// Unsunk ship cells in row-major order.
    pub fn ship_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.ships.iter_set_bits().map(Coord::from)
    }

    /// Overwrite one cell, clearing whatever state it held before.
    fn mark(&mut self, at: Coord, cell: Cell) -> Result<(), BoardError> {
        let (r, c) = self.checked_index(at)?;
        self.ships.clear(r, c)?;
        self.hits.clear(r, c)?;
        self.misses.clear(r, c)?;
        match cell {
            Cell::Empty => {}
            Cell::Ship => self.ships.set(r, c)?,
            Cell::Hit => self.hits.set(r, c)?,
            Cell::Miss => self.misses.set(r, c)?,
        }
        Ok(())
    }

    fn index(&self, at: Coord) -> Option<(usize, usize)> {
        let (r, c) = at.to_index()?;
        (r < self.size && c < self.size).then_some((r, c))
    }

    fn checked_index(&self, at: Coord) -> Result<(usize, usize), BoardError> {
        self.index(at).ok_or(BoardError::OutOfRange {
            row: at.row,
            col: at.col,
        })
    }
}

/// Grid dump: `.` empty, `B` ship, `X` hit, `O` miss.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            for c in 0..self.size {
                let glyph = match self.cell_state(Coord::from((r, c))) {
                    Ok(Cell::Empty) => '.',
                    Ok(Cell::Ship) => 'B',
                    Ok(Cell::Hit) => 'X',
                    Ok(Cell::Miss) => 'O',
                    Err(_) => '?',
                };
                write!(f, "{}", glyph)?;
                if c + 1 < self.size {
                    write!(f, " ")?;
                }
            }
            if r + 1 < self.size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Board {{ size: {}, ships: {}, hits: {}, misses: {} }}",
            self.size,
            self.ships.count_ones(),
            self.hits.count_ones(),
            self.misses.count_ones()
        )
    }
}
