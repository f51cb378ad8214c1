//! The core board representation for the Xiangqi engine.

use crate::constants::{COLS, Piece, PieceKind, ROWS, Side};
use crate::error::{EngineError, Result};
use crate::r#move::Move;
use crate::square::Square;
use std::fmt;

pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

/// Represents the placement of pieces at any point in time.
///
/// A board is a plain value: cloning it yields a fully independent copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; ROWS * COLS],
}

impl Board {
    pub fn empty() -> Self {
        Self { cells: [None; ROWS * COLS] }
    }

    /// The standard starting position. Ids are assigned in row-major order.
    pub fn initial() -> Self {
        // START_FEN is a constant known to parse.
        match Board::from_fen(START_FEN) {
            Ok((board, _)) => board,
            Err(_) => unreachable!("start position must parse"),
        }
    }

    /// Parses the board layout and side-to-move fields of a FEN string.
    ///
    /// Ids are assigned in row-major order starting at zero. Any trailing
    /// FEN fields are ignored.
    pub fn from_fen(fen: &str) -> Result<(Self, Side)> {
        let invalid = || EngineError::InvalidPosition(fen.to_string());
        let mut board = Board::empty();
        let mut parts = fen.split_whitespace();

        let layout = parts.next().ok_or_else(invalid)?;
        let mut next_id = 0;
        let mut rank = 0;
        let mut file = 0;
        for ch in layout.chars() {
            if ch == '/' {
                if file != COLS {
                    return Err(invalid());
                }
                rank += 1;
                file = 0;
            } else if let Some(digit) = ch.to_digit(10) {
                file += digit as usize;
            } else {
                let piece = Piece::from_fen_char(ch, next_id).ok_or_else(invalid)?;
                let sq = Square::new(rank, file).map_err(|_| invalid())?;
                board.put(sq, Some(piece));
                next_id += 1;
                file += 1;
            }
            if file > COLS {
                return Err(invalid());
            }
        }
        if rank != ROWS - 1 || file != COLS {
            return Err(invalid());
        }

        let side = match parts.next() {
            None | Some("w") | Some("r") => Side::Red,
            Some("b") => Side::Black,
            Some(_) => return Err(invalid()),
        };
        Ok((board, side))
    }

    pub fn to_fen(&self, side_to_move: Side) -> String {
        let mut fen = String::with_capacity(96);
        for r in 0..ROWS {
            let mut empty_count = 0;
            for c in 0..COLS {
                match self.cells[r * COLS + c] {
                    None => empty_count += 1,
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if r < ROWS - 1 {
                fen.push('/');
            }
        }

        // Active color
        fen.push(' ');
        fen.push(if side_to_move == Side::Red { 'w' } else { 'b' });
        fen
    }

    /// Looks up a cell by raw coordinates.
    pub fn get(&self, row: usize, col: usize) -> Result<Option<Piece>> {
        Ok(self.at(Square::new(row, col)?))
    }

    /// Replaces a cell by raw coordinates.
    pub fn set(&mut self, row: usize, col: usize, cell: Option<Piece>) -> Result<()> {
        self.put(Square::new(row, col)?, cell);
        Ok(())
    }

    #[inline]
    pub fn at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    #[inline]
    pub fn put(&mut self, sq: Square, cell: Option<Piece>) {
        self.cells[sq.index()] = cell;
    }

    pub fn is_empty_at(&self, sq: Square) -> bool {
        self.cells[sq.index()].is_none()
    }

    pub fn side_at(&self, sq: Square) -> Option<Side> {
        self.at(sq).map(|piece| piece.side)
    }

    pub fn locate_general(&self, side: Side) -> Option<Square> {
        self.pieces(side)
            .find(|(_, piece)| piece.kind == PieceKind::General)
            .map(|(sq, _)| sq)
    }

    /// Iterates the squares and pieces owned by `side` in row-major order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, piece)| piece.side == side)
    }

    /// Iterates every occupied square in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|piece| (Square::from_index(i), piece)))
    }

    /// Moves the piece on `mv.from` to `mv.to` and returns what was captured.
    pub fn apply(&mut self, mv: Move) -> Option<Piece> {
        let moving_piece = self.cells[mv.from.index()].take();
        std::mem::replace(&mut self.cells[mv.to.index()], moving_piece)
    }

    /// Returns a copy of the board with `mv` applied.
    pub fn with_move(&self, mv: Move) -> Board {
        let mut next = self.clone();
        next.apply(mv);
        next
    }

    /// True if both boards hold the same side and kind on every square.
    pub fn same_arrangement(&self, other: &Board) -> bool {
        self.cells.iter().zip(other.cells.iter()).all(|(a, b)| match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_identity(*b),
            _ => false,
        })
    }

    /// The highest piece id on the board, if any piece is present.
    pub fn max_id(&self) -> Option<u32> {
        self.occupied().map(|(_, piece)| piece.id).max()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "    0 1 2 3 4 5 6 7 8")?;
        writeln!(f, "  +-------------------+")?;
        for r in 0..ROWS {
            write!(f, "{} | ", r)?;
            for c in 0..COLS {
                match self.cells[r * COLS + c] {
                    Some(piece) => write!(f, "{} ", piece.to_fen_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "|")?;
            if r == 4 {
                writeln!(f, "  |~~~~~~~~~~~~~~~~~~~|")?;
            }
        }
        writeln!(f, "  +-------------------+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_initial_layout() {
        let board = Board::initial();
        assert_eq!(board.occupied().count(), 32);
        assert_eq!(board.locate_general(Side::Red), Some(sq(9, 4)));
        assert_eq!(board.locate_general(Side::Black), Some(sq(0, 4)));
        let cannon = board.get(7, 1).unwrap().unwrap();
        assert_eq!((cannon.side, cannon.kind), (Side::Red, PieceKind::Cannon));
        assert_eq!(board.get(3, 0).unwrap().unwrap().kind, PieceKind::Soldier);
        assert_eq!(board.get(4, 4).unwrap(), None);
        assert_eq!(board.to_fen(Side::Red), START_FEN);
    }

    #[test]
    fn test_ids_are_unique() {
        let board = Board::initial();
        let mut ids: Vec<u32> = board.occupied().map(|(_, p)| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 32);
        assert_eq!(board.max_id(), Some(31));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut board = Board::empty();
        assert_eq!(board.get(10, 0), Err(EngineError::OutOfBounds { row: 10, col: 0 }));
        assert_eq!(
            board.set(0, 9, None),
            Err(EngineError::OutOfBounds { row: 0, col: 9 })
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let board = Board::initial();
        let mut copy = board.clone();
        copy.set(9, 4, None).unwrap();
        assert!(board.locate_general(Side::Red).is_some());
        assert!(copy.locate_general(Side::Red).is_none());
    }

    #[test]
    fn test_apply_returns_capture() {
        let (mut board, _) = Board::from_fen("4k4/9/9/9/9/9/9/4r4/4R4/4K4 w").unwrap();
        let captured = board.apply(Move::new(sq(8, 4), sq(7, 4)));
        assert_eq!(captured.map(|p| p.code()), Some("bR".to_string()));
        assert!(board.is_empty_at(sq(8, 4)));
        assert_eq!(board.at(sq(7, 4)).unwrap().code(), "rR");
    }

    #[test]
    fn test_arrangement_ignores_ids() {
        let a = Board::initial();
        let mut b = Board::initial();
        let mut general = b.at(sq(9, 4)).unwrap();
        general.id = 99;
        b.put(sq(9, 4), Some(general));
        assert_ne!(a, b);
        assert!(a.same_arrangement(&b));
        b.apply(Move::new(sq(9, 4), sq(8, 4)));
        assert!(!a.same_arrangement(&b));
    }

    #[test]
    fn test_fen_rejects_garbage() {
        assert!(Board::from_fen("rnbakabnr/9 w").is_err());
        assert!(Board::from_fen("rnbakabnrr/9/9/9/9/9/9/9/9/9 w").is_err());
        assert!(Board::from_fen("xnbakabnr/9/9/9/9/9/9/9/9/9 w").is_err());
        let (_, side) = Board::from_fen("4k4/9/9/9/9/9/9/9/9/4K4 b").unwrap();
        assert_eq!(side, Side::Black);
    }
}
