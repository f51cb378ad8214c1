//! Legality filters on top of the pseudo-legal generator.
//!
//! A pseudo-legal move is legal when, after it is played on a copy of the
//! board, the mover's General is not attacked and the two Generals do not
//! face each other down an open file.

use crate::board::Board;
use crate::constants::Side;
use crate::move_gen::{self, open_file_between};
use crate::movelist::MoveList;
use crate::r#move::Move;
use crate::square::Square;

/// True if both Generals stand on one column with nothing between them.
pub fn generals_facing(board: &Board) -> bool {
    match (board.locate_general(Side::Red), board.locate_general(Side::Black)) {
        (Some(red), Some(black)) => open_file_between(board, red, black),
        _ => false,
    }
}

/// Checks whether `side`'s General can be taken by an opposing pseudo move.
///
/// Returns false if the General is no longer on the board.
pub fn is_in_check(board: &Board, side: Side) -> bool {
    match board.locate_general(side) {
        Some(general) => move_gen::is_square_attacked_by(board, general, side.opponent()),
        None => false,
    }
}

/// Checks a pseudo-legal move of `side` against both legality filters.
pub fn is_legal(board: &Board, mv: Move, side: Side) -> bool {
    let next = board.with_move(mv);
    // A General taking the other General leaves one General, so it never "faces".
    !generals_facing(&next) && !is_in_check(&next, side)
}

/// Legal moves of the piece on `from`, which must belong to `side`.
///
/// Returns an empty list if the square is empty or holds an opposing piece.
pub fn legal_moves(board: &Board, from: Square, side: Side) -> MoveList {
    if board.side_at(from) != Some(side) {
        return MoveList::new();
    }
    let mut moves = move_gen::pseudo_moves(board, from);
    moves.retain(|&mv| is_legal(board, mv, side));
    moves
}

/// Legal moves of every piece of `side`, in row-major order of origin squares.
pub fn legal_moves_all(board: &Board, side: Side) -> MoveList {
    let mut moves = move_gen::pseudo_moves_all(board, side);
    moves.retain(|&mv| is_legal(board, mv, side));
    moves
}

/// True if `side` has at least one legal move. Stops at the first one found.
pub fn has_legal_move(board: &Board, side: Side) -> bool {
    move_gen::pseudo_moves_all(board, side)
        .iter()
        .any(|&mv| is_legal(board, mv, side))
}
