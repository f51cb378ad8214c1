//! Board coordinates.

use crate::constants::{COLS, ROWS};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated `(row, col)` coordinate. Row 0 is Black's back rank.
///
/// Serialized as `{ "r": row, "c": col }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSquare", into = "RawSquare")]
pub struct Square {
    row: u8,
    col: u8,
}

#[derive(Serialize, Deserialize)]
struct RawSquare {
    r: usize,
    c: usize,
}

impl Square {
    pub const ORIGIN: Square = Square { row: 0, col: 0 };

    pub fn new(row: usize, col: usize) -> Result<Self> {
        if row < ROWS && col < COLS {
            Ok(Self { row: row as u8, col: col as u8 })
        } else {
            Err(EngineError::OutOfBounds { row, col })
        }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Row-major index in `0..90`.
    pub fn index(self) -> usize {
        self.row() * COLS + self.col()
    }

    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < ROWS * COLS);
        Self { row: (index / COLS) as u8, col: (index % COLS) as u8 }
    }

    /// The square `(dr, dc)` away, if it is still on the board.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        let r = self.row as isize + dr;
        let c = self.col as isize + dc;
        if (0..ROWS as isize).contains(&r) && (0..COLS as isize).contains(&c) {
            Some(Self { row: r as u8, col: c as u8 })
        } else {
            None
        }
    }

    /// Every square in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..ROWS * COLS).map(Square::from_index)
    }
}

impl TryFrom<RawSquare> for Square {
    type Error = EngineError;

    fn try_from(raw: RawSquare) -> Result<Self> {
        Square::new(raw.r, raw.c)
    }
}

impl From<Square> for RawSquare {
    fn from(sq: Square) -> Self {
        RawSquare { r: sq.row(), c: sq.col() }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
