//! Final table assembly
//!
//! Date parsing, team codes and the missing-value policy.

use crate::data::stats::{stat_columns, RollingStats};
use crate::table::record::HeadToHeadRecord;
use crate::{Result, VolleyballError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Date formats accepted in schedule logs
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m/%d/%y"];

/// What to do with missing rolling stats in the final table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Leave missing values in place
    #[default]
    Keep,
    /// Remove every record with a missing value
    Drop,
    /// Replace missing values with zero
    Fill,
}

impl MissingPolicy {
    /// Policy from drop/fill flags; requesting both is an error
    pub fn from_flags(drop_missing: bool, fill_missing: bool) -> Result<Self> {
        match (drop_missing, fill_missing) {
            (true, true) => Err(VolleyballError::InvalidArgument(
                "drop_missing and fill_missing cannot both be true".to_string(),
            )),
            (true, false) => Ok(MissingPolicy::Drop),
            (false, true) => Ok(MissingPolicy::Fill),
            (false, false) => Ok(MissingPolicy::Keep),
        }
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPolicy::Keep => write!(f, "keep"),
            MissingPolicy::Drop => write!(f, "drop"),
            MissingPolicy::Fill => write!(f, "fill"),
        }
    }
}

/// A row of the assembled table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRow {
    pub date: NaiveDate,
    pub t1: String,
    pub t1_stats: RollingStats,
    pub t2: String,
    pub t2_stats: RollingStats,
    pub result: u8,
    pub t1_code: u32,
    pub t2_code: u32,
}

/// A single table cell, for writers
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Date(NaiveDate),
    Text(&'a str),
    Number(f64),
    Int(u32),
    Missing,
}

impl From<Option<f64>> for Cell<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Missing)
    }
}

impl GameRow {
    /// Cells in [`HeadToHeadTable::column_names`] order
    pub fn cells(&self) -> Vec<Cell<'_>> {
        let mut cells = Vec::with_capacity(HeadToHeadTable::column_count());
        cells.push(Cell::Date(self.date));
        cells.push(Cell::Text(&self.t1));
        cells.extend(self.t1_stats.values().map(Cell::from));
        cells.push(Cell::Text(&self.t2));
        cells.extend(self.t2_stats.values().map(Cell::from));
        cells.push(Cell::Int(self.result as u32));
        cells.push(Cell::Int(self.t1_code));
        cells.push(Cell::Int(self.t2_code));
        cells
    }

    pub fn has_missing(&self) -> bool {
        self.t1_stats.has_missing() || self.t2_stats.has_missing()
    }
}

/// The assembled head-to-head table
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadToHeadTable {
    pub rows: Vec<GameRow>,
    /// Team name to categorical code
    pub team_codes: BTreeMap<String, u32>,
}

impl HeadToHeadTable {
    /// Output column names in order
    pub fn column_names() -> Vec<String> {
        let stat_names = || stat_columns().map(|(_, _, name)| name);
        let mut columns = Vec::with_capacity(Self::column_count());
        columns.push("date".to_string());
        columns.push("t1".to_string());
        columns.extend(stat_names().map(|c| format!("t1_{}", c)));
        columns.push("t2".to_string());
        columns.extend(stat_names().map(|c| format!("t2_{}", c)));
        columns.push("result".to_string());
        columns.push("t1_code".to_string());
        columns.push("t2_code".to_string());
        columns
    }

    pub fn column_count() -> usize {
        2 * crate::data::stats::STAT_COLUMN_COUNT + 6
    }

    /// Build the table from flattened records.
    ///
    /// Codes are assigned from every team in `records` before the policy drops any rows.
    pub fn assemble(records: Vec<HeadToHeadRecord>, policy: MissingPolicy) -> Result<Self> {
        let team_codes = team_codes(&records);

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            if policy == MissingPolicy::Drop && record.has_missing() {
                continue;
            }
            let (t1_stats, t2_stats) = match policy {
                MissingPolicy::Fill => (record.t1_stats.filled(0.0), record.t2_stats.filled(0.0)),
                _ => (record.t1_stats, record.t2_stats),
            };
            rows.push(GameRow {
                date: parse_date(&record.date)?,
                t1_code: team_codes[&record.t1],
                t2_code: team_codes[&record.t2],
                t1: record.t1,
                t1_stats,
                t2: record.t2,
                t2_stats,
                result: record.result,
            });
        }

        Ok(HeadToHeadTable { rows, team_codes })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count of missing stat cells across the table
    pub fn missing_cells(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.t1_stats.values().chain(r.t2_stats.values()))
            .filter(|v| v.is_none())
            .count()
    }
}

/// Codes by sorted position in the union of `t1` and `t2` names
fn team_codes(records: &[HeadToHeadRecord]) -> BTreeMap<String, u32> {
    let names: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| [r.t1.as_str(), r.t2.as_str()])
        .collect();
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i as u32))
        .collect()
}

/// Parse a logged date; any time-of-day suffix is ignored
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let day = raw
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or("");
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
        .ok_or_else(|| VolleyballError::Parse(format!("Unrecognized game date: {:?}", raw)))
}
