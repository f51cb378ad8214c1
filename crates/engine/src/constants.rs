//! Constants used in the Xiangqi engine.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const ROWS: usize = 10;
pub const COLS: usize = 9;

/// The two sides. Red moves first and owns rows 5-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

/// A piece on the board.
///
/// `id` only follows the piece's visual identity across moves. Rules compare
/// pieces by side and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: u32,
    pub side: Side,
    pub kind: PieceKind,
}

// --- Search and Evaluation Constants ---
/// Score for a side whose General has been taken; offset by remaining depth.
pub const GENERAL_LOST_VALUE: i32 = 20_000;
/// Score for a side with no legal move; offset by remaining depth.
pub const NO_MOVES_VALUE: i32 = 10_000;
/// Bound used as +/- infinity by the search.
pub const INFINITY: i32 = 1_000_000;

// --- Piece Base Values ---
// Indexed by `PieceKind::index()`.
pub const PIECE_VALUES: [i32; 7] = [
    10000, // GENERAL
    200,   // ADVISOR
    200,   // ELEPHANT
    400,   // HORSE
    1000,  // CHARIOT
    450,   // CANNON
    100,   // SOLDIER
];

impl Side {
    /// Get the opponent of the current side.
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Gets the table index for a side (0 for Red, 1 for Black).
    pub fn index(self) -> usize {
        if self == Side::Red { 0 } else { 1 }
    }

    pub fn code(self) -> char {
        match self {
            Side::Red => 'r',
            Side::Black => 'b',
        }
    }

    pub fn from_code(c: char) -> Option<Side> {
        match c {
            'r' => Some(Side::Red),
            'b' => Some(Side::Black),
            _ => None,
        }
    }

    /// Direction of forward travel in row terms.
    pub fn forward(self) -> isize {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }

    /// Whether `row` lies on this side's own half of the board.
    pub fn owns_row(self, row: usize) -> bool {
        match self {
            Side::Red => row >= 5,
            Side::Black => row <= 4,
        }
    }

    /// Whether `(row, col)` lies inside this side's palace.
    pub fn in_palace(self, row: usize, col: usize) -> bool {
        let rows = match self {
            Side::Red => 7..=9,
            Side::Black => 0..=2,
        };
        rows.contains(&row) && (3..=5).contains(&col)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Red => write!(f, "red"),
            Side::Black => write!(f, "black"),
        }
    }
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Get the material value of a piece kind.
    pub fn value(self) -> i32 {
        PIECE_VALUES[self.index()]
    }

    pub fn code(self) -> char {
        match self {
            PieceKind::General => 'K',
            PieceKind::Advisor => 'A',
            PieceKind::Elephant => 'B',
            PieceKind::Horse => 'N',
            PieceKind::Chariot => 'R',
            PieceKind::Cannon => 'C',
            PieceKind::Soldier => 'P',
        }
    }

    pub fn from_code(c: char) -> Option<PieceKind> {
        PieceKind::ALL.into_iter().find(|kind| kind.code() == c)
    }
}

impl Piece {
    pub fn new(id: u32, side: Side, kind: PieceKind) -> Self {
        Self { id, side, kind }
    }

    pub fn value(self) -> i32 {
        self.kind.value()
    }

    /// Two-character code such as `rK` or `bN`.
    pub fn code(self) -> String {
        let mut code = String::with_capacity(2);
        code.push(self.side.code());
        code.push(self.kind.code());
        code
    }

    /// Parses a two-character code; the caller supplies the id.
    pub fn from_code(code: &str, id: u32) -> Option<Piece> {
        let mut chars = code.chars();
        let side = Side::from_code(chars.next()?)?;
        let kind = PieceKind::from_code(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Piece::new(id, side, kind))
    }

    /// Same side and kind, regardless of id.
    pub fn same_identity(self, other: Piece) -> bool {
        self.side == other.side && self.kind == other.kind
    }

    /// FEN letter: upper case for Red, lower case for Black.
    pub fn to_fen_char(self) -> char {
        let c = self.kind.code();
        match self.side {
            Side::Red => c,
            Side::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_fen_char(c: char, id: u32) -> Option<Piece> {
        let side = if c.is_ascii_uppercase() { Side::Red } else { Side::Black };
        let kind = match c.to_ascii_uppercase() {
            'E' => PieceKind::Elephant,
            'H' => PieceKind::Horse,
            upper => PieceKind::from_code(upper)?,
        };
        Some(Piece::new(id, side, kind))
    }

    /// Chinese glyph used by the console board.
    pub fn glyph(self) -> char {
        match (self.side, self.kind) {
            (Side::Red, PieceKind::General) => '帅',
            (Side::Red, PieceKind::Advisor) => '仕',
            (Side::Red, PieceKind::Elephant) => '相',
            (Side::Red, PieceKind::Soldier) => '兵',
            (Side::Black, PieceKind::General) => '将',
            (Side::Black, PieceKind::Advisor) => '士',
            (Side::Black, PieceKind::Elephant) => '象',
            (Side::Black, PieceKind::Soldier) => '卒',
            (_, PieceKind::Horse) => '马',
            (_, PieceKind::Chariot) => '车',
            (_, PieceKind::Cannon) => '炮',
        }
    }
}
