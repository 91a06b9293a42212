//! Flattened head-to-head records

use crate::data::stats::RollingStats;
use crate::matching::ValidatedPair;
use serde::{Deserialize, Serialize};

/// One game with both teams' pre-game rolling stats.
///
/// Stats are copied verbatim from the two schedule rows; missing values stay missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadRecord {
    /// Date as logged
    pub date: String,
    pub t1: String,
    pub t1_stats: RollingStats,
    pub t2: String,
    pub t2_stats: RollingStats,
    /// 0 if team 1 won, 1 if team 2 won
    pub result: u8,
}

impl HeadToHeadRecord {
    pub fn flatten(pair: &ValidatedPair<'_>) -> Self {
        HeadToHeadRecord {
            date: pair.date.to_string(),
            t1: pair.team1.to_string(),
            t1_stats: pair.row1.stats,
            t2: pair.team2.to_string(),
            t2_stats: pair.row2.stats,
            result: pair.winner.code(),
        }
    }

    pub fn has_missing(&self) -> bool {
        self.t1_stats.has_missing() || self.t2_stats.has_missing()
    }
}
