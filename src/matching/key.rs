//! Canonical game keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key shared by both teams' rows of the same game.
///
/// Team names are stored by string order, never by own/opponent role, so
/// either side's row derives the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameKey {
    pub date: String,
    /// Lexicographically greater team name (team 1)
    pub high: String,
    /// Lexicographically lesser team name (team 2)
    pub low: String,
}

impl GameKey {
    /// Derive a key from a date and two trimmed team names
    pub fn derive(date: &str, own: &str, opponent: &str) -> Self {
        let (high, low) = if own > opponent {
            (own, opponent)
        } else {
            (opponent, own)
        };
        GameKey {
            date: date.to_string(),
            high: high.to_string(),
            low: low.to_string(),
        }
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}~{}", self.date, self.high, self.low)
    }
}
