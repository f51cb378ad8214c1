//! The main search engine.
//!
//! Plain negamax with alpha-beta pruning over copied boards. Every root move
//! is searched with a full window so its score is exact; the final choice
//! among equally good moves is left to a caller-supplied random source.

use crate::board::Board;
use crate::config::Config;
use crate::constants::{GENERAL_LOST_VALUE, INFINITY, NO_MOVES_VALUE, Side};
use crate::evaluate;
use crate::movelist::MoveList;
use crate::r#move::Move;
use crate::rules;
use rand::Rng;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use std::time::Instant;
use tracing::debug;

/// A struct to hold a move and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// The search engine.
pub struct Engine {
    pub nodes_searched: u64,
    pub start_time: Instant,
    pub config: Config,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            nodes_searched: 0,
            start_time: Instant::now(),
            config,
        }
    }

    /// Picks a move for `side` searching `depth` plies.
    ///
    /// All root moves scoring within `config.tie_tolerance` of the best are
    /// candidates, and one of them is drawn from `rng`. Returns `None` if
    /// `side` has no legal move. A depth of zero is searched as one.
    pub fn choose_move<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        side: Side,
        depth: u32,
        rng: &mut R,
    ) -> Option<Move> {
        self.nodes_searched = 0;
        self.start_time = Instant::now();

        let scored = self.score_root_moves(board, side, depth);
        let candidates = best_candidates(&scored, self.config.tie_tolerance);
        let chosen = candidates.choose(rng).copied();

        debug!(
            %side,
            depth,
            nodes = self.nodes_searched,
            best = scored.iter().map(|sm| sm.score).max(),
            candidates = candidates.len(),
            elapsed_ms = self.start_time.elapsed().as_millis() as u64,
            "search finished"
        );
        chosen
    }

    /// Exact negamax score of every legal root move, in search order.
    pub fn score_root_moves(&mut self, board: &Board, side: Side, depth: u32) -> Vec<ScoredMove> {
        let depth = depth.max(1);
        let mut moves = rules::legal_moves_all(board, side);
        order_moves(board, &mut moves);

        moves
            .iter()
            .map(|&mv| {
                let child = board.with_move(mv);
                let score = -self.negamax(&child, depth - 1, -INFINITY, INFINITY, side.opponent());
                ScoredMove { mv, score }
            })
            .collect()
    }

    /// Score of `board` for `side` to move, searched `depth` more plies.
    pub fn negamax(&mut self, board: &Board, depth: u32, mut alpha: i32, beta: i32, side: Side) -> i32 {
        self.nodes_searched += 1;
        let remaining = depth as i32;

        if board.locate_general(side).is_none() {
            return -(GENERAL_LOST_VALUE + remaining);
        }
        if board.locate_general(side.opponent()).is_none() {
            return GENERAL_LOST_VALUE + remaining;
        }
        if depth == 0 {
            return evaluate::evaluate(board, side);
        }

        let mut moves = rules::legal_moves_all(board, side);
        if moves.is_empty() {
            return -(NO_MOVES_VALUE + remaining);
        }
        order_moves(board, &mut moves);

        let mut best = -INFINITY;
        for &mv in &moves {
            let child = board.with_move(mv);
            let score = -self.negamax(&child, depth - 1, -beta, -alpha, side.opponent());
            best = best.max(score);
            alpha = alpha.max(best);
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Ordering key: captures first, larger victims before smaller ones.
fn score_move(board: &Board, mv: Move) -> i32 {
    board.at(mv.to).map_or(0, |victim| victim.value())
}

/// Sorts captures to the front. The sort is stable, so quiet moves keep
/// generation order.
fn order_moves(board: &Board, moves: &mut MoveList) {
    moves.as_mut_slice().sort_by_key(|&mv| Reverse(score_move(board, mv)));
}

/// Moves scoring within `tolerance` of the best score, in input order.
pub fn best_candidates(scored: &[ScoredMove], tolerance: u32) -> Vec<Move> {
    let Some(best) = scored.iter().map(|sm| sm.score).max() else {
        return Vec::new();
    };
    let floor = best.saturating_sub_unsigned(tolerance);
    scored
        .iter()
        .filter(|sm| sm.score >= floor)
        .map(|sm| sm.mv)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn board(fen: &str) -> (Board, Side) {
        Board::from_fen(fen).unwrap()
    }

    fn mv(from: (usize, usize), to: (usize, usize)) -> Move {
        Move::new(Square::new(from.0, from.1).unwrap(), Square::new(to.0, to.1).unwrap())
    }

    /// Reference negamax without pruning or ordering.
    fn plain_negamax(board: &Board, depth: u32, side: Side) -> i32 {
        let remaining = depth as i32;
        if board.locate_general(side).is_none() {
            return -(GENERAL_LOST_VALUE + remaining);
        }
        if board.locate_general(side.opponent()).is_none() {
            return GENERAL_LOST_VALUE + remaining;
        }
        if depth == 0 {
            return evaluate::evaluate(board, side);
        }
        let moves = rules::legal_moves_all(board, side);
        if moves.is_empty() {
            return -(NO_MOVES_VALUE + remaining);
        }
        moves
            .iter()
            .map(|&m| -plain_negamax(&board.with_move(m), depth - 1, side.opponent()))
            .max()
            .unwrap_or(-INFINITY)
    }

    #[test]
    fn test_unique_best_move_is_always_chosen() {
        let (b, side) = board("3k5/9/9/9/9/R7r/9/9/9/5K3 w");
        let capture = mv((5, 0), (5, 8));
        let mut engine = Engine::default();
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(engine.choose_move(&b, side, 1, &mut rng), Some(capture));
        }
        assert!(engine.nodes_searched > 0);
    }

    #[test]
    fn test_general_capture_scores_as_win() {
        let (b, side) = board("4k4/9/9/9/9/9/9/9/9/4K4 w");
        let mut engine = Engine::default();
        let scored = engine.score_root_moves(&b, side, 2);
        let capture = mv((9, 4), (0, 4));
        let best = scored.iter().max_by_key(|sm| sm.score).unwrap();
        assert_eq!(best.mv, capture);
        assert_eq!(best.score, GENERAL_LOST_VALUE + 1);
        // Captures are searched first.
        assert_eq!(scored[0].mv, capture);
    }

    #[test]
    fn test_blockaded_side_gets_no_move() {
        let (b, side) = board("3aka3/4n4/9/9/9/9/9/9/9/4K4 b");
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(Engine::default().choose_move(&b, side, 2, &mut rng), None);
        let mut engine = Engine::default();
        assert_eq!(engine.negamax(&b, 2, -INFINITY, INFINITY, side), -(NO_MOVES_VALUE + 2));
    }

    #[test]
    fn test_pruning_does_not_change_root_scores() {
        let positions = [
            ("r1bakab1r/9/1cn4cn/p1p1p1p1p/9/2P6/P3P1P1P/1C2C1N2/9/RNBAKAB1R b", 2),
            ("4k4/4a4/9/9/9/2r6/9/2N6/4A4/3K5 w", 3),
            ("3ak4/4a4/4b4/9/2n6/6R2/9/4C4/9/3K5 b", 3),
        ];
        for (fen, depth) in positions {
            let (b, side) = board(fen);
            let mut engine = Engine::default();
            for sm in engine.score_root_moves(&b, side, depth) {
                let expected = -plain_negamax(&b.with_move(sm.mv), depth - 1, side.opponent());
                assert_eq!(sm.score, expected, "{} in {}", sm.mv, fen);
            }
        }
    }

    #[test]
    fn test_ties_are_broken_randomly() {
        // Both cannons can take a horse; the two captures score the same.
        let b = Board::initial();
        let mut engine = Engine::default();
        let scored = engine.score_root_moves(&b, Side::Red, 1);
        let candidates = best_candidates(&scored, 0);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.contains(&mv((7, 1), (0, 1))));
        assert!(candidates.contains(&mv((7, 7), (0, 7))));

        let mut seen = HashSet::new();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            seen.insert(engine.choose_move(&b, Side::Red, 1, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_best_candidates_tolerance() {
        let a = mv((0, 0), (1, 0));
        let b = mv((0, 1), (1, 1));
        let c = mv((0, 2), (1, 2));
        let scored = [
            ScoredMove { mv: a, score: 50 },
            ScoredMove { mv: b, score: 47 },
            ScoredMove { mv: c, score: 50 },
        ];
        assert_eq!(best_candidates(&scored, 0), vec![a, c]);
        assert_eq!(best_candidates(&scored, 3), vec![a, b, c]);
        assert!(best_candidates(&[], 0).is_empty());
    }

    #[test]
    fn test_wide_tolerance_keeps_every_move() {
        let a = mv((0, 0), (1, 0));
        let b = mv((0, 1), (1, 1));
        let scored = [
            ScoredMove { mv: a, score: -GENERAL_LOST_VALUE },
            ScoredMove { mv: b, score: GENERAL_LOST_VALUE },
        ];
        assert_eq!(best_candidates(&scored, u32::MAX), vec![a, b]);

        let (pos, side) = board("3k5/9/9/9/9/R7r/9/9/9/5K3 w");
        let mut engine = Engine::new(Config {
            tie_tolerance: u32::MAX,
            ..Config::default()
        });
        let legal = rules::legal_moves_all(&pos, side);
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let chosen = engine.choose_move(&pos, side, 1, &mut rng).unwrap();
            assert!(legal.contains(&chosen));
        }
    }

    #[test]
    fn test_captures_ordered_by_victim_value() {
        // The Generals stand on different files, so only the chariot and horse can be taken.
        let (b, _) = board("3k5/9/9/9/9/9/2r1R1n2/9/9/4K4 w");
        let mut moves = rules::legal_moves_all(&b, Side::Red);
        order_moves(&b, &mut moves);
        assert_eq!(moves[0], mv((6, 4), (6, 2)));
        assert_eq!(moves[1], mv((6, 4), (6, 6)));
        assert!(moves.len() > 2);
        for m in moves.iter().skip(2) {
            assert!(b.is_empty_at(m.to), "{} should be quiet", m);
        }
    }
}
