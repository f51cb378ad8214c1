//! Configuration for the Xiangqi engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Search difficulty tiers, each mapped to a fixed search depth in plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Shallow,
    #[default]
    Medium,
    Deep,
}

impl Difficulty {
    pub fn depth(self) -> u32 {
        match self {
            Difficulty::Shallow => 1,
            Difficulty::Medium => 2,
            Difficulty::Deep => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Shallow => write!(f, "shallow"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Deep => write!(f, "deep"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty {0:?}; expected shallow, medium or deep")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shallow" | "low" | "1" => Ok(Difficulty::Shallow),
            "medium" | "2" => Ok(Difficulty::Medium),
            "deep" | "high" | "3" => Ok(Difficulty::Deep),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub difficulty: Difficulty,
    /// Root moves scoring within this many points of the best are treated as ties.
    pub tie_tolerance: u32,
}

impl Config {
    pub fn search_depth(&self) -> u32 {
        self.difficulty.depth()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            tie_tolerance: 0,
        }
    }
}
