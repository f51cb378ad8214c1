//! Pseudo-legal move generation, including pre-computed geometry tables.
//!
//! Everything here is pure geometry: moves may still leave the mover's own
//! General exposed. The `rules` module filters them down to legal moves.

use crate::board::Board;
use crate::constants::{Piece, PieceKind, Side};
use crate::movelist::MoveList;
use crate::r#move::Move;
use crate::square::Square;
use once_cell::sync::Lazy;

const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const HORSE_JUMPS: [(isize, isize); 8] =
    [(-2, -1), (-2, 1), (2, -1), (2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2)];

/// A destination together with the square that must be empty to reach it
/// (the horse's leg or the elephant's eye).
pub type Gated = (Square, Square);

/// A struct to hold all the pre-computed geometry tables.
/// The tables are initialized once and then accessed globally.
pub struct MoveTables {
    pub general: [Vec<Vec<Square>>; 2], // [side][square]
    pub advisor: [Vec<Vec<Square>>; 2],
    pub elephant: [Vec<Vec<Gated>>; 2],
    pub soldier: [Vec<Vec<Square>>; 2],
    pub horse: Vec<Vec<Gated>>,
    pub rays: Vec<[Vec<Square>; 4]>, // [square][direction], nearest square first
}

impl MoveTables {
    fn new() -> Self {
        let general = per_side(|side, sq| steps(sq, &ORTHOGONAL, |to| side.in_palace(to.row(), to.col())));
        let advisor = per_side(|side, sq| steps(sq, &DIAGONAL, |to| side.in_palace(to.row(), to.col())));

        // Soldiers always step forward; sideways steps only open up past the river.
        let soldier = per_side(|side, sq| {
            let mut targets: Vec<Square> = sq.offset(side.forward(), 0).into_iter().collect();
            if !side.owns_row(sq.row()) {
                targets.extend(sq.offset(0, -1));
                targets.extend(sq.offset(0, 1));
            }
            targets
        });

        let elephant = [Side::Red, Side::Black].map(|side| {
            Square::all()
                .map(|sq| {
                    DIAGONAL
                        .iter()
                        .filter_map(|&(dr, dc)| {
                            let to = sq.offset(dr * 2, dc * 2)?;
                            let eye = sq.offset(dr, dc)?;
                            side.owns_row(to.row()).then_some((to, eye))
                        })
                        .collect::<Vec<Gated>>()
                })
                .collect()
        });

        let horse = Square::all()
            .map(|sq| {
                HORSE_JUMPS
                    .iter()
                    .filter_map(|&(dr, dc)| {
                        let to = sq.offset(dr, dc)?;
                        let leg = if dr.abs() == 2 { sq.offset(dr / 2, 0)? } else { sq.offset(0, dc / 2)? };
                        Some((to, leg))
                    })
                    .collect::<Vec<Gated>>()
            })
            .collect();

        let rays = Square::all()
            .map(|sq| {
                ORTHOGONAL.map(|(dr, dc)| {
                    (1..)
                        .map_while(|i| sq.offset(dr * i, dc * i))
                        .collect::<Vec<Square>>()
                })
            })
            .collect();

        MoveTables { general, advisor, elephant, soldier, horse, rays }
    }
}

fn per_side(build: impl Fn(Side, Square) -> Vec<Square>) -> [Vec<Vec<Square>>; 2] {
    [Side::Red, Side::Black].map(|side| Square::all().map(|sq| build(side, sq)).collect())
}

fn steps(sq: Square, offsets: &[(isize, isize)], allowed: impl Fn(Square) -> bool) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(dr, dc)| sq.offset(dr, dc))
        .filter(|&to| allowed(to))
        .collect()
}

// The global static instance of the geometry tables, initialized lazily and only once.
pub static MOVE_TABLES: Lazy<MoveTables> = Lazy::new(MoveTables::new);

/// True if `a` and `b` share a column and every square strictly between them is empty.
pub fn open_file_between(board: &Board, a: Square, b: Square) -> bool {
    if a.col() != b.col() {
        return false;
    }
    let (low, high) = if a.row() < b.row() { (a.row(), b.row()) } else { (b.row(), a.row()) };
    ((low + 1)..high).all(|row| board.is_empty_at(Square::from_index(row * 9 + a.col())))
}

/// Generates the pseudo-legal moves of the piece on `from`.
///
/// Returns an empty list for an empty square.
pub fn pseudo_moves(board: &Board, from: Square) -> MoveList {
    let mut moves = MoveList::new();
    if let Some(piece) = board.at(from) {
        generate_piece_moves(board, from, piece, &mut moves);
    }
    moves
}

/// Generates the pseudo-legal moves of every piece owned by `side`.
pub fn pseudo_moves_all(board: &Board, side: Side) -> MoveList {
    let mut moves = MoveList::new();
    for (from, piece) in board.pieces(side) {
        generate_piece_moves(board, from, piece, &mut moves);
    }
    moves
}

fn generate_piece_moves(board: &Board, from: Square, piece: Piece, moves: &mut MoveList) {
    let tables = &*MOVE_TABLES;
    let side = piece.side;
    let mut add = |to: Square| {
        if board.side_at(to) != Some(side) {
            moves.add(Move::new(from, to));
        }
    };

    match piece.kind {
        PieceKind::Chariot => {
            for ray in &tables.rays[from.index()] {
                for &to in ray {
                    let occupied = !board.is_empty_at(to);
                    add(to);
                    if occupied {
                        break;
                    }
                }
            }
        }
        PieceKind::Cannon => {
            for ray in &tables.rays[from.index()] {
                let mut screened = false;
                for &to in ray {
                    let occupied = !board.is_empty_at(to);
                    if !screened {
                        if occupied {
                            screened = true;
                        } else {
                            add(to);
                        }
                    } else if occupied {
                        add(to);
                        break;
                    }
                }
            }
        }
        PieceKind::Horse => {
            for &(to, leg) in &tables.horse[from.index()] {
                if board.is_empty_at(leg) {
                    add(to);
                }
            }
        }
        PieceKind::Elephant => {
            for &(to, eye) in &tables.elephant[side.index()][from.index()] {
                if board.is_empty_at(eye) {
                    add(to);
                }
            }
        }
        PieceKind::Advisor => {
            for &to in &tables.advisor[side.index()][from.index()] {
                add(to);
            }
        }
        PieceKind::Soldier => {
            for &to in &tables.soldier[side.index()][from.index()] {
                add(to);
            }
        }
        PieceKind::General => {
            for &to in &tables.general[side.index()][from.index()] {
                add(to);
            }
            // Flying general: capture the opposing General down an open file.
            if let Some(enemy) = board.locate_general(side.opponent()) {
                if open_file_between(board, from, enemy) {
                    add(enemy);
                }
            }
        }
    }
}

/// Checks whether any piece of `attacker` could move onto `target`.
///
/// This is a geometry-only query; it never consults the legality filter, so
/// it can be used from inside it.
pub fn is_square_attacked_by(board: &Board, target: Square, attacker: Side) -> bool {
    board
        .pieces(attacker)
        .any(|(from, _)| pseudo_moves(board, from).iter().any(|mv| mv.to == target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap().0
    }

    fn targets(board: &Board, from: Square) -> Vec<(usize, usize)> {
        let mut out: Vec<(usize, usize)> =
            pseudo_moves(board, from).iter().map(|m| (m.to.row(), m.to.col())).collect();
        out.sort_unstable();
        out
    }

    #[test]
    fn test_chariot_stops_at_blockers() {
        // Red chariot at (5,4), red soldier at (5,6), black horse at (2,4).
        let b = board("3k5/9/4n4/9/9/4R1P2/9/9/9/5K3 w");
        let t = targets(&b, sq(5, 4));
        assert!(t.contains(&(2, 4)));
        assert!(!t.contains(&(1, 4)));
        assert!(t.contains(&(5, 5)));
        assert!(!t.contains(&(5, 6)));
        assert!(t.contains(&(9, 4)));
        assert!(t.contains(&(5, 0)));
        assert_eq!(t.len(), 3 + 4 + 1 + 4);
    }

    #[test]
    fn test_cannon_needs_a_screen_to_capture() {
        // Red cannon at (7,1); screen at (4,1); black rook at (1,1).
        let b = board("3k5/1r7/9/9/1P7/9/9/1C7/9/5K3 w");
        let t = targets(&b, sq(7, 1));
        assert!(t.contains(&(1, 1)));
        assert!(!t.contains(&(4, 1)));
        assert!(t.contains(&(5, 1)));
        assert!(!t.contains(&(2, 1)));
        assert!(!t.contains(&(3, 1)));

        // No capture by plain slide.
        let b = board("3k5/9/9/9/9/9/9/1C1r5/9/5K3 w");
        assert!(!targets(&b, sq(7, 1)).contains(&(7, 3)));
        assert!(targets(&b, sq(7, 1)).contains(&(7, 2)));
    }

    #[test]
    fn test_cannon_cannot_take_own_piece_beyond_screen() {
        let b = board("3k5/1P7/9/9/1p7/9/9/1C7/9/5K3 w");
        let t = targets(&b, sq(7, 1));
        assert!(!t.contains(&(1, 1)));
        assert!(!t.contains(&(0, 1)));
    }

    #[test]
    fn test_horse_leg_blocking() {
        let b = board("3k5/9/9/9/9/9/9/9/9/1N3K3 w");
        assert_eq!(targets(&b, sq(9, 1)), vec![(7, 0), (7, 2), (8, 3)]);

        // A piece directly in front blocks both forward jumps.
        let b = board("3k5/9/9/9/9/9/9/9/1P7/1N3K3 w");
        assert_eq!(targets(&b, sq(9, 1)), vec![(8, 3)]);
    }

    #[test]
    fn test_elephant_eye_and_river() {
        let b = board("3k5/9/9/9/9/2B6/9/9/9/5K3 w");
        // From (5,2) the two forward targets cross the river.
        assert_eq!(targets(&b, sq(5, 2)), vec![(7, 0), (7, 4)]);

        let b = board("3k5/9/9/9/9/9/9/9/3P5/2B2K3 w");
        assert_eq!(targets(&b, sq(9, 2)), vec![(7, 0)]);
    }

    #[test]
    fn test_advisor_and_general_stay_in_palace() {
        let b = board("3k5/9/9/9/9/9/9/9/9/3AK4 w");
        assert_eq!(targets(&b, sq(9, 3)), vec![(8, 4)]);
        assert_eq!(targets(&b, sq(9, 4)), vec![(8, 4), (9, 5)]);

        let b = board("3k5/9/9/9/9/9/9/5K3/9/9 w");
        assert_eq!(targets(&b, sq(7, 5)), vec![(7, 4), (8, 5)]);
    }

    #[test]
    fn test_general_flying_capture() {
        let b = board("4k4/9/9/9/9/9/9/9/9/4K4 w");
        assert!(targets(&b, sq(9, 4)).contains(&(0, 4)));
        assert!(targets(&b, sq(0, 4)).contains(&(9, 4)));

        let b = board("4k4/9/9/9/4p4/9/9/9/9/4K4 w");
        assert!(!targets(&b, sq(9, 4)).contains(&(0, 4)));
    }

    #[test]
    fn test_soldier_gains_sideways_after_river() {
        let b = board("3k5/9/9/9/9/9/4P4/9/9/5K3 w");
        assert_eq!(targets(&b, sq(6, 4)), vec![(5, 4)]);

        let b = board("3k5/9/9/9/4P4/9/9/9/9/5K3 w");
        assert_eq!(targets(&b, sq(4, 4)), vec![(3, 4), (4, 3), (4, 5)]);

        // Black soldiers move down the board.
        let b = board("3k5/9/9/9/9/4p4/9/9/9/5K3 b");
        assert_eq!(targets(&b, sq(5, 4)), vec![(5, 3), (5, 5), (6, 4)]);

        // At the far edge only sideways steps remain.
        let b = board("4P4/9/9/9/9/9/9/9/9/3K5 w");
        assert_eq!(targets(&b, sq(0, 4)), vec![(0, 3), (0, 5)]);
    }

    #[test]
    fn test_initial_position_attack_query() {
        let b = Board::initial();
        assert!(!is_square_attacked_by(&b, sq(9, 4), Side::Black));
        // The red cannon on (7,1) screens the black cannon's shot at the horse.
        assert!(!is_square_attacked_by(&b, sq(7, 1), Side::Black));
        assert!(is_square_attacked_by(&b, sq(9, 1), Side::Black));
        assert_eq!(pseudo_moves_all(&b, Side::Red).len(), 44);
    }
}
