//! Pair validation and role resolution
//!
//! Turns a game group into a validated two-team pair or a rejection reason.

use crate::data::schedule::{parse_own_sets, ScheduleRow};
use crate::data::stats::{Metric, Window};
use crate::matching::aggregate::GroupEntry;
use crate::matching::key::GameKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sets needed to win a best-of-five match
pub const SETS_TO_WIN: u32 = 3;

/// Winning side of a resolved game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Team1,
    Team2,
}

impl Winner {
    /// Output encoding: 0 for team 1, 1 for team 2
    pub fn code(&self) -> u8 {
        match self {
            Winner::Team1 => 0,
            Winner::Team2 => 1,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Team1 => write!(f, "t1"),
            Winner::Team2 => write!(f, "t2"),
        }
    }
}

/// Why a game group produced no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("expected 2 rows for the game, found {entries}")]
    Cardinality { entries: usize },

    #[error("rows are not from {high} and {low}")]
    UnmatchedRoles { high: String, low: String },

    #[error("unreadable result {result:?} in {team}'s log")]
    MalformedResult { team: String, result: String },

    #[error("both rows share opponent/venue and season digs")]
    DuplicateRows,

    #[error("both teams report a 3-set win")]
    DoubleWin,
}

/// Rejection reason without its payload, for tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RejectionKind {
    Cardinality,
    UnmatchedRoles,
    MalformedResult,
    DuplicateRows,
    DoubleWin,
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::Cardinality { .. } => RejectionKind::Cardinality,
            Rejection::UnmatchedRoles { .. } => RejectionKind::UnmatchedRoles,
            Rejection::MalformedResult { .. } => RejectionKind::MalformedResult,
            Rejection::DuplicateRows => RejectionKind::DuplicateRows,
            Rejection::DoubleWin => RejectionKind::DoubleWin,
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RejectionKind::Cardinality => "wrong row count",
            RejectionKind::UnmatchedRoles => "unmatched teams",
            RejectionKind::MalformedResult => "malformed result",
            RejectionKind::DuplicateRows => "duplicate rows",
            RejectionKind::DoubleWin => "double win",
        };
        write!(f, "{}", name)
    }
}

/// Two opposite perspectives of one game with roles assigned.
///
/// Team 1 is the lexicographically greater name, not the home team or winner.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedPair<'a> {
    pub date: &'a str,
    pub team1: &'a str,
    pub team2: &'a str,
    pub row1: &'a ScheduleRow,
    pub row2: &'a ScheduleRow,
    pub winner: Winner,
}

/// Validate a game group and assign team roles
pub fn resolve<'a>(
    key: &'a GameKey,
    entries: &[GroupEntry<'a>],
) -> std::result::Result<ValidatedPair<'a>, Rejection> {
    let [first, second] = entries else {
        return Err(Rejection::Cardinality {
            entries: entries.len(),
        });
    };

    let (row1, row2) = assign_roles(key, first, second)?;

    let team1_sets = own_sets(row1)?;
    // Only team 1's own result decides the winner
    let winner = if team1_sets == SETS_TO_WIN {
        Winner::Team1
    } else {
        Winner::Team2
    };

    if same_present(&row1.opponent_venue, &row2.opponent_venue)
        && same_present(
            &row1.stats.get(Metric::Digs, Window::Season),
            &row2.stats.get(Metric::Digs, Window::Season),
        )
    {
        return Err(Rejection::DuplicateRows);
    }

    if team1_sets == SETS_TO_WIN && own_sets(row2)? == SETS_TO_WIN {
        return Err(Rejection::DoubleWin);
    }

    Ok(ValidatedPair {
        date: &key.date,
        team1: &key.high,
        team2: &key.low,
        row1,
        row2,
        winner,
    })
}

fn assign_roles<'a>(
    key: &GameKey,
    first: &GroupEntry<'a>,
    second: &GroupEntry<'a>,
) -> std::result::Result<(&'a ScheduleRow, &'a ScheduleRow), Rejection> {
    if key.high != key.low {
        if first.team == key.high && second.team == key.low {
            return Ok((first.row, second.row));
        }
        if second.team == key.high && first.team == key.low {
            return Ok((second.row, first.row));
        }
    }
    Err(Rejection::UnmatchedRoles {
        high: key.high.clone(),
        low: key.low.clone(),
    })
}

fn own_sets(row: &ScheduleRow) -> std::result::Result<u32, Rejection> {
    parse_own_sets(&row.result).ok_or_else(|| Rejection::MalformedResult {
        team: row.own_team.clone(),
        result: row.result.clone(),
    })
}

// Missing values never compare equal
fn same_present<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}
