//! The authoritative game: record, replay cursor, and turn bookkeeping.
//!
//! A `Game` is either live (the last snapshot is the position in play) or in
//! replay, where a cursor selects an earlier snapshot for viewing. Moves are
//! only accepted while live and before the game has ended.

use crate::board::Board;
use crate::constants::Side;
use crate::error::{EngineError, Result};
use crate::movelist::MoveList;
use crate::outcome::{self, Outcome};
use crate::r#move::Move;
use crate::record::{GameRecord, Snapshot};
use crate::rules;
use crate::square::Square;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Game {
    record: GameRecord,
    replay: Option<usize>,
    computer: Option<Side>,
}

impl Game {
    /// A new game from the starting position. `computer` is the side the
    /// engine plays, if any.
    pub fn new(computer: Option<Side>) -> Self {
        Self {
            record: GameRecord::new(Snapshot::initial()),
            replay: None,
            computer,
        }
    }

    /// Discards the record and starts over from the initial position.
    pub fn new_game(&mut self) {
        self.record = GameRecord::new(Snapshot::initial());
        self.replay = None;
        info!("new game");
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn computer_side(&self) -> Option<Side> {
        self.computer
    }

    pub fn is_replaying(&self) -> bool {
        self.replay.is_some()
    }

    pub fn replay_index(&self) -> Option<usize> {
        self.replay
    }

    /// The snapshot being shown: the replay cursor's, or the live one.
    pub fn current_snapshot(&self) -> &Snapshot {
        self.replay
            .and_then(|index| self.record.get(index))
            .unwrap_or_else(|| self.record.last())
    }

    fn live(&self) -> &Snapshot {
        self.record.last()
    }

    pub fn side_to_move(&self) -> Side {
        self.current_snapshot().side_to_move
    }

    /// Whether the live position has ended, either as recorded or because
    /// the rules say so now.
    pub fn is_terminal(&self) -> bool {
        self.live().terminal || outcome::is_game_over(self.record.as_slice()).is_over()
    }

    /// Outcome at the snapshot being shown.
    pub fn is_game_over(&self) -> Outcome {
        let end = self.replay.unwrap_or(self.record.len() - 1);
        outcome::is_game_over(&self.record.as_slice()[..=end])
    }

    /// Legal moves of `side`'s piece on `from`.
    ///
    /// Empty while replaying, once the game has ended, when `side` is not to
    /// move, or if `from` does not hold one of its pieces.
    pub fn legal_moves(&self, from: Square, side: Side) -> MoveList {
        if self.is_replaying() || side != self.live().side_to_move || self.is_terminal() {
            return MoveList::new();
        }
        rules::legal_moves(&self.live().board, from, side)
    }

    /// Every legal move for the side to move. Empty while replaying or once
    /// the game has ended.
    pub fn all_legal_moves(&self) -> MoveList {
        if self.is_replaying() || self.is_terminal() {
            return MoveList::new();
        }
        let live = self.live();
        rules::legal_moves_all(&live.board, live.side_to_move)
    }

    /// Plays `mv` for the side to move and appends the resulting snapshot.
    ///
    /// Fails with `IllegalMove`, leaving the game unchanged, if the move is
    /// not legal, the game has ended, or a replay is in progress.
    pub fn apply_move(&mut self, mv: Move) -> Result<Outcome> {
        if !self.legal_moves(mv.from, self.live().side_to_move).contains(&mv) {
            warn!(%mv, "rejected move");
            return Err(EngineError::IllegalMove(mv));
        }

        let live = self.live();
        let board = live.board.with_move(mv);
        let side_to_move = live.side_to_move.opponent();
        let outcome = outcome::evaluate_position(self.record.as_slice(), &board, side_to_move);
        self.record.push(Snapshot {
            board,
            side_to_move,
            terminal: outcome.is_over(),
            last_move: Some(mv),
        });

        debug!(%mv, ply = self.record.len() - 1, "move applied");
        if outcome.is_over() {
            info!(%outcome, "game over");
        }
        Ok(outcome)
    }

    /// True when the live position is waiting on the computer's move.
    pub fn awaiting_computer(&self) -> bool {
        !self.is_replaying() && !self.is_terminal() && self.computer == Some(self.live().side_to_move)
    }

    /// The board and side to search for, if the computer is to move.
    ///
    /// The board is a copy, so the search can run elsewhere while the game
    /// stays untouched.
    pub fn search_request(&self) -> Option<(Board, Side)> {
        self.awaiting_computer()
            .then(|| (self.live().board.clone(), self.live().side_to_move))
    }

    /// Takes back the last turn and returns the number of plies removed.
    ///
    /// With a computer opponent, undoing on the human's turn also takes back
    /// the human's previous move. Does nothing while replaying, after the game
    /// has ended, or at the initial position.
    pub fn undo_last_turn(&mut self) -> usize {
        if self.is_replaying() || self.is_terminal() || self.record.len() <= 1 {
            return 0;
        }

        let human_to_move = self
            .computer
            .is_some_and(|computer| self.live().side_to_move != computer);
        let mut undone = 1;
        self.record.truncate(self.record.len() - 1);
        if human_to_move && self.record.len() >= 2 {
            self.record.truncate(self.record.len() - 1);
            undone += 1;
        }

        info!(undone, ply = self.record.len() - 1, "undo");
        undone
    }

    /// Starts viewing the record from its first snapshot.
    pub fn enter_replay(&mut self) -> &Snapshot {
        if self.replay.is_none() {
            self.replay = Some(0);
            info!(snapshots = self.record.len(), "entered replay");
        }
        self.current_snapshot()
    }

    /// Leaves replay and shows the live position again.
    pub fn exit_replay(&mut self) {
        if self.replay.take().is_some() {
            info!("left replay");
        }
    }

    /// Moves the replay cursor to `index`.
    ///
    /// Returns `None` and leaves the cursor alone if not replaying or if
    /// `index` is past the end of the record.
    pub fn seek_replay(&mut self, index: usize) -> Option<&Snapshot> {
        if self.replay.is_none() || index >= self.record.len() {
            return None;
        }
        self.replay = Some(index);
        self.record.get(index)
    }

    /// Moves the replay cursor by `delta`, clamped to the record.
    pub fn step_replay(&mut self, delta: isize) -> Option<&Snapshot> {
        let index = self.replay?;
        let last = self.record.len() - 1;
        let target = index.saturating_add_signed(delta).min(last);
        self.seek_replay(target)
    }

    /// Truncates the record after the replay cursor and continues play live.
    ///
    /// Returns true if it is now the computer's turn.
    pub fn resume_from_replay(&mut self) -> bool {
        let Some(index) = self.replay.take() else {
            return false;
        };
        self.record.truncate(index + 1);
        info!(ply = index, "resumed from replay");
        self.awaiting_computer()
    }

    /// Serializes the whole record.
    pub fn save(&self) -> Result<String> {
        self.record.to_json()
    }

    /// Replaces the record with one parsed from `json` and enters replay at
    /// its last snapshot. On error the game is left unchanged.
    pub fn load(&mut self, json: &str) -> Result<()> {
        let record = GameRecord::from_json(json).inspect_err(|err| warn!(%err, "load failed"))?;
        info!(snapshots = record.len(), "record loaded");
        self.replay = Some(record.len() - 1);
        self.record = record;
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Some(Side::Black))
    }
}
