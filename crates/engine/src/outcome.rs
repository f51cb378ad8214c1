//! Terminal-state detection: captured General, no legal moves, repetition.

use crate::board::Board;
use crate::constants::Side;
use crate::record::Snapshot;
use crate::rules;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinReason {
    GeneralCaptured,
    NoLegalMoves,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Repetition,
}

/// The state of a game at one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Win { winner: Side, reason: WinReason },
    Draw(DrawReason),
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::Win { winner, .. } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Ongoing => write!(f, "game in progress"),
            Outcome::Win { winner, reason: WinReason::GeneralCaptured } => {
                write!(f, "{} wins: the {} General was captured", winner, winner.opponent())
            }
            Outcome::Win { winner, reason: WinReason::NoLegalMoves } => {
                write!(f, "{} wins: {} has no legal moves", winner, winner.opponent())
            }
            Outcome::Draw(DrawReason::Repetition) => write!(f, "draw by threefold repetition"),
        }
    }
}

/// Number of times the same arrangement and side to move occurred earlier.
///
/// Only snapshots an even number of plies back are compared, so the side to
/// move always matches the current one in a well-formed record.
pub fn repetition_count(history: &[Snapshot], board: &Board, side_to_move: Side) -> usize {
    history
        .iter()
        .rev()
        .skip(1)
        .step_by(2)
        .filter(|earlier| earlier.side_to_move == side_to_move && earlier.board.same_arrangement(board))
        .count()
}

/// Classifies a position given the snapshots that precede it.
///
/// `history` must not include the position itself. Checks run in order:
/// missing General, then no legal moves for the side to move, then a third
/// occurrence of the position.
pub fn evaluate_position(history: &[Snapshot], board: &Board, side_to_move: Side) -> Outcome {
    for side in [Side::Red, Side::Black] {
        if board.locate_general(side).is_none() {
            return Outcome::Win { winner: side.opponent(), reason: WinReason::GeneralCaptured };
        }
    }

    if !rules::has_legal_move(board, side_to_move) {
        return Outcome::Win { winner: side_to_move.opponent(), reason: WinReason::NoLegalMoves };
    }

    if repetition_count(history, board, side_to_move) >= 2 {
        return Outcome::Draw(DrawReason::Repetition);
    }

    Outcome::Ongoing
}

/// Outcome at the last snapshot of `snapshots`.
pub fn is_game_over(snapshots: &[Snapshot]) -> Outcome {
    match snapshots.split_last() {
        Some((current, earlier)) => evaluate_position(earlier, &current.board, current.side_to_move),
        None => Outcome::Ongoing,
    }
}
