//! Evaluates a board position and returns a score.

mod psts;

use crate::board::Board;
use crate::constants::{Piece, PieceKind, ROWS, Side};
use crate::square::Square;

/// Returns the positional table for a piece kind, if it has one.
pub fn get_pst(kind: PieceKind) -> Option<&'static [[i32; 9]; 10]> {
    match kind {
        PieceKind::Soldier => Some(&psts::SOLDIER_PST),
        PieceKind::Horse => Some(&psts::HORSE_PST),
        PieceKind::Chariot => Some(&psts::CHARIOT_PST),
        _ => None,
    }
}

/// Positional bonus for `piece` standing on `sq`.
pub fn get_pst_score(piece: Piece, sq: Square) -> i32 {
    // Tables are laid out for Red; Black reads them upside down.
    let row = match piece.side {
        Side::Red => sq.row(),
        Side::Black => ROWS - 1 - sq.row(),
    };
    get_pst(piece.kind).map_or(0, |table| table[row][sq.col()])
}

/// Material plus positional value of one piece, always positive.
pub fn piece_score(piece: Piece, sq: Square) -> i32 {
    piece.value() + get_pst_score(piece, sq)
}

/// Static score of `board` from `perspective`'s point of view.
///
/// Pieces of `perspective` add their score, opposing pieces subtract it.
pub fn evaluate(board: &Board, perspective: Side) -> i32 {
    board
        .occupied()
        .map(|(sq, piece)| {
            let score = piece_score(piece, sq);
            if piece.side == perspective { score } else { -score }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap().0
    }

    #[test]
    fn test_initial_position_is_balanced() {
        let b = Board::initial();
        assert_eq!(evaluate(&b, Side::Red), 0);
        assert_eq!(evaluate(&b, Side::Black), 0);
    }

    #[test]
    fn test_tables_are_mirrored_for_black() {
        let b = board("4k4/9/9/4P4/9/9/4p4/9/9/4K4 w");
        assert_eq!(evaluate(&b, Side::Red), 0);

        let red = Piece::new(0, Side::Red, PieceKind::Soldier);
        let black = Piece::new(1, Side::Black, PieceKind::Soldier);
        assert_eq!(get_pst_score(red, Square::new(3, 4).unwrap()), 110);
        assert_eq!(get_pst_score(black, Square::new(6, 4).unwrap()), 110);
        assert_eq!(get_pst_score(red, Square::new(6, 4).unwrap()), 0);
    }

    #[test]
    fn test_material_and_position_terms() {
        // Extra red chariot on (5,0): 1000 material plus 110 positional.
        let b = board("4k4/9/9/9/9/R8/9/9/9/4K4 w");
        assert_eq!(evaluate(&b, Side::Red), 1110);
        assert_eq!(evaluate(&b, Side::Black), -1110);
    }

    #[test]
    fn test_kinds_without_tables_score_material_only() {
        let cannon = Piece::new(0, Side::Red, PieceKind::Cannon);
        assert_eq!(piece_score(cannon, Square::new(2, 4).unwrap()), 450);
        assert!(get_pst(PieceKind::General).is_none());
    }
}
