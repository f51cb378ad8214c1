//! Defines the representation of a move in the engine.

use crate::square::Square;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a single move from one square to another.
///
/// Serialized as `{ "from": {"r":..,"c":..}, "to": {"r":..,"c":..} }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    /// Creates a new move.
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
