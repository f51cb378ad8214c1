//! Position snapshots, the game record, and its JSON save format.
//!
//! A saved record is a JSON array with one object per snapshot:
//!
//! ```json
//! { "board": [[null, "bR", ...], ...], "currentPlayer": "red",
//!   "gameOver": false, "lastMove": { "from": {"r":7,"c":1}, "to": {"r":7,"c":4} } }
//! ```
//!
//! Cells are written as two-character codes. On load a cell may also be an
//! object `{ "id": 3, "code": "rK" }`; ids missing from the file are carried
//! over from the previous snapshot along `lastMove` where possible.

use crate::board::Board;
use crate::constants::{COLS, Piece, ROWS, Side};
use crate::error::{EngineError, Result};
use crate::r#move::Move;
use crate::square::Square;
use serde::{Deserialize, Serialize};

/// One position in the game, with the move that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub side_to_move: Side,
    pub terminal: bool,
    pub last_move: Option<Move>,
}

impl Snapshot {
    /// The standard starting position with Red to move.
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),
            side_to_move: Side::Red,
            terminal: false,
            last_move: None,
        }
    }
}

/// Append-only sequence of snapshots; index 0 is the starting position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    snapshots: Vec<Snapshot>,
}

impl GameRecord {
    pub fn new(initial: Snapshot) -> Self {
        Self { snapshots: vec![initial] }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a record holds at least its initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> &Snapshot {
        // The constructor and `truncate` both keep at least one snapshot.
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn as_slice(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    /// Drops everything after the first `len` snapshots. Never drops the first.
    pub fn truncate(&mut self, len: usize) {
        self.snapshots.truncate(len.max(1));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    /// Serializes the record to its JSON save format.
    pub fn to_json(&self) -> Result<String> {
        let wire: Vec<WireSnapshot> = self.snapshots.iter().map(WireSnapshot::from).collect();
        Ok(serde_json::to_string(&wire)?)
    }

    /// Parses a record from JSON.
    ///
    /// Only the structure is checked: the sequence of positions is taken as
    /// given and is not replayed for legality.
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: Vec<WireSnapshot> = serde_json::from_str(json)?;
        if wire.is_empty() {
            return Err(EngineError::MalformedRecord("record contains no snapshots".into()));
        }

        let mut snapshots: Vec<Snapshot> = Vec::with_capacity(wire.len());
        for (index, raw) in wire.into_iter().enumerate() {
            let previous = snapshots.last().map(|prev| &prev.board);
            let board = decode_board(&raw.board, previous, raw.last_move)
                .map_err(|msg| EngineError::MalformedRecord(format!("snapshot {}: {}", index, msg)))?;
            snapshots.push(Snapshot {
                board,
                side_to_move: raw.current_player,
                terminal: raw.game_over,
                last_move: raw.last_move,
            });
        }
        Ok(Self { snapshots })
    }
}

impl<'a> IntoIterator for &'a GameRecord {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSnapshot {
    board: Vec<Vec<Option<WireCell>>>,
    current_player: Side,
    game_over: bool,
    #[serde(default)]
    last_move: Option<Move>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireCell {
    Code(String),
    Tagged { id: u32, code: String },
}

impl From<&Snapshot> for WireSnapshot {
    fn from(snapshot: &Snapshot) -> Self {
        let board = (0..ROWS)
            .map(|r| {
                (0..COLS)
                    .map(|c| snapshot.board.at(Square::from_index(r * COLS + c)))
                    .map(|cell| cell.map(|piece| WireCell::Code(piece.code())))
                    .collect()
            })
            .collect();
        WireSnapshot {
            board,
            current_player: snapshot.side_to_move,
            game_over: snapshot.terminal,
            last_move: snapshot.last_move,
        }
    }
}

fn decode_board(
    rows: &[Vec<Option<WireCell>>],
    previous: Option<&Board>,
    last_move: Option<Move>,
) -> std::result::Result<Board, String> {
    if rows.len() != ROWS {
        return Err(format!("expected {} rows, found {}", ROWS, rows.len()));
    }

    let mut board = Board::empty();
    let mut pending: Vec<Square> = Vec::new();
    let mut explicit_max: Option<u32> = None;
    for (r, row) in rows.iter().enumerate() {
        if row.len() != COLS {
            return Err(format!("row {} has {} cells, expected {}", r, row.len(), COLS));
        }
        for (c, cell) in row.iter().enumerate() {
            let Some(cell) = cell else { continue };
            let sq = Square::from_index(r * COLS + c);
            let (code, id) = match cell {
                WireCell::Code(code) => (code, None),
                WireCell::Tagged { id, code } => (code, Some(*id)),
            };
            let piece = Piece::from_code(code, id.unwrap_or(0))
                .ok_or_else(|| format!("unknown piece code {:?} at ({}, {})", code, r, c))?;
            match id {
                Some(id) => explicit_max = explicit_max.max(Some(id)),
                None => pending.push(sq),
            }
            board.put(sq, Some(piece));
        }
    }

    // `None` once the id space is used up.
    let mut next_id = match explicit_max.max(previous.and_then(Board::max_id)) {
        Some(id) => id.checked_add(1),
        None => Some(0),
    };
    for sq in pending {
        let Some(mut piece) = board.at(sq) else { continue };
        piece.id = match carried_id(previous, last_move, sq, piece) {
            Some(id) => id,
            None => {
                let id = next_id.ok_or_else(|| format!("no piece id left for ({}, {})", sq.row(), sq.col()))?;
                next_id = id.checked_add(1);
                id
            }
        };
        board.put(sq, Some(piece));
    }
    Ok(board)
}

/// Finds the id the piece on `sq` had in the previous snapshot, if any.
fn carried_id(previous: Option<&Board>, last_move: Option<Move>, sq: Square, piece: Piece) -> Option<u32> {
    let previous = previous?;
    let origin = match last_move {
        Some(mv) if mv.to == sq => mv.from,
        _ => sq,
    };
    previous
        .at(origin)
        .filter(|before| before.same_identity(piece))
        .map(|before| before.id)
}
