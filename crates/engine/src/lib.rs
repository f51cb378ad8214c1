pub mod board;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod game;
pub mod move_gen;
pub mod movelist;
pub mod r#move;
pub mod outcome;
pub mod record;
pub mod rules;
pub mod square;

pub use board::Board;
pub use config::{Config, Difficulty};
pub use constants::{Piece, PieceKind, Side};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use game::Game;
pub use r#move::Move;
pub use outcome::Outcome;
pub use record::{GameRecord, Snapshot};
pub use square::Square;
