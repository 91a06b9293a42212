//! Team schedule logs
//!
//! One CSV file per team and season, one row per game from that team's side.

use crate::data::stats::{parse_stat, stat_columns, Metric, RollingStats, Window};
use crate::{Result, VolleyballError};
use csv::StringRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::OnceLock;

pub const OPPONENT_COLUMN: &str = "opponent";
pub const DATE_COLUMN: &str = "date";
pub const RESULT_COLUMN: &str = "result";
pub const VENUE_COLUMN: &str = "opponent/venue";

/// Identity of a schedule log, taken from its file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogId {
    /// File name as found on disk, e.g. `Stanford-schedule-2021.csv`
    pub file_name: String,
    /// Team the log belongs to
    pub team: String,
    /// Season year, when the file name carries one
    pub season: Option<u16>,
}

impl LogId {
    /// Split a file name of the form `<team>-schedule[-<year>]...csv`.
    ///
    /// Names without a `-schedule` segment use the whole file stem as the team.
    pub fn from_file_name(file_name: &str) -> Self {
        let team = match file_name.split_once("-schedule") {
            Some((team, _)) => team,
            None => file_name.strip_suffix(".csv").unwrap_or(file_name),
        }
        .trim()
        .to_string();

        let season = season_pattern()
            .captures(file_name)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok());

        LogId {
            file_name: file_name.to_string(),
            team,
            season,
        }
    }
}

fn season_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-schedule-(\d{4})").expect("season pattern is valid"))
}

/// One team's logged perspective of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Team whose log this row came from
    pub own_team: String,
    pub opponent: String,
    /// Date as logged; only compared for equality until the table is assembled
    pub date: String,
    /// Set score from this team's side, e.g. `3-1`
    pub result: String,
    /// Raw `opponent/venue` cell
    pub opponent_venue: Option<String>,
    pub stats: RollingStats,
}

impl ScheduleRow {
    /// Sets won by this row's own team, read from the front of `result`
    pub fn own_sets(&self) -> Option<u32> {
        parse_own_sets(&self.result)
    }
}

/// Parse the leading set count of a `"<own>-<opp>"` result string
pub fn parse_own_sets(result: &str) -> Option<u32> {
    result.split('-').next()?.trim().parse().ok()
}

/// A parsed schedule log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleLog {
    pub id: LogId,
    pub rows: Vec<ScheduleRow>,
    /// Stat columns the file did not have; their values are missing in every row
    pub missing_stat_columns: Vec<String>,
}

impl ScheduleLog {
    pub fn team(&self) -> &str {
        &self.id.team
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parse a log from CSV text
    pub fn from_reader<R: Read>(id: LogId, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(VolleyballError::EmptyLog(id.file_name));
        }

        let columns = ColumnIndices::find(&headers, &id)?;
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(columns.row(&record, &id.team));
        }

        Ok(ScheduleLog {
            id,
            rows,
            missing_stat_columns: columns.missing_stats,
        })
    }
}

/// Header positions, resolved once per file
struct ColumnIndices {
    opponent: usize,
    date: usize,
    result: usize,
    venue: Option<usize>,
    stats: Vec<(Metric, Window, Option<usize>)>,
    missing_stats: Vec<String>,
}

impl ColumnIndices {
    fn find(headers: &StringRecord, id: &LogId) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            position(name).ok_or_else(|| VolleyballError::MissingColumn {
                log: id.file_name.clone(),
                column: name.to_string(),
            })
        };

        let mut stats = Vec::new();
        let mut missing_stats = Vec::new();
        for (metric, window, name) in stat_columns() {
            let idx = position(name);
            if idx.is_none() {
                missing_stats.push(name.to_string());
            }
            stats.push((metric, window, idx));
        }

        Ok(ColumnIndices {
            opponent: require(OPPONENT_COLUMN)?,
            date: require(DATE_COLUMN)?,
            result: require(RESULT_COLUMN)?,
            venue: position(VENUE_COLUMN),
            stats,
            missing_stats,
        })
    }

    fn row(&self, record: &StringRecord, own_team: &str) -> ScheduleRow {
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let mut stats = RollingStats::default();
        for &(metric, window, idx) in &self.stats {
            stats.set(metric, window, idx.and_then(|i| parse_stat(field(i))));
        }

        ScheduleRow {
            own_team: own_team.to_string(),
            opponent: field(self.opponent).trim().to_string(),
            date: field(self.date).to_string(),
            result: field(self.result).to_string(),
            opponent_venue: self
                .venue
                .map(field)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        let mut cols = vec!["date", "opponent", "opponent/venue", "result"];
        cols.extend(stat_columns().map(|(_, _, name)| name));
        cols.join(",")
    }

    #[test]
    fn test_log_id_from_file_name() {
        let id = LogId::from_file_name("Penn State -schedule-2021.csv");
        assert_eq!(id.team, "Penn State");
        assert_eq!(id.season, Some(2021));

        let id = LogId::from_file_name("Texas.csv");
        assert_eq!(id.team, "Texas");
        assert_eq!(id.season, None);

        // pattern is compiled once and reused
        let id = LogId::from_file_name("Baylor-schedule-2019.csv");
        assert_eq!(id.season, Some(2019));
        assert!(std::ptr::eq(season_pattern(), season_pattern()));
    }

    #[test]
    fn test_parse_own_sets() {
        assert_eq!(parse_own_sets("3-1"), Some(3));
        assert_eq!(parse_own_sets(" 2 - 3"), Some(2));
        assert_eq!(parse_own_sets("W"), None);
        assert_eq!(parse_own_sets(""), None);
    }

    #[test]
    fn test_parse_log() {
        let stats = vec!["1.5"; 24].join(",");
        let csv = format!(
            "{}\n2021-09-01, Stanford ,@ Stanford,3-1,{}\n",
            header(),
            stats
        );
        let id = LogId::from_file_name("Texas-schedule-2021.csv");
        let log = ScheduleLog::from_reader(id, csv.as_bytes()).unwrap();

        assert_eq!(log.len(), 1);
        let row = &log.rows[0];
        assert_eq!(row.own_team, "Texas");
        assert_eq!(row.opponent, "Stanford");
        assert_eq!(row.opponent_venue.as_deref(), Some("@ Stanford"));
        assert_eq!(row.own_sets(), Some(3));
        assert_eq!(row.stats.get(Metric::Points, Window::Last3), Some(1.5));
        assert!(log.missing_stat_columns.is_empty());
    }

    #[test]
    fn test_missing_stat_columns_are_missing_values() {
        let csv = "date,opponent,result\n2021-09-01,Stanford,3-1\n";
        let id = LogId::from_file_name("Texas-schedule-2021.csv");
        let log = ScheduleLog::from_reader(id, csv.as_bytes()).unwrap();

        assert_eq!(log.missing_stat_columns.len(), 24);
        assert_eq!(log.rows[0].opponent_venue, None);
        assert!(log.rows[0].stats.values().all(|v| v.is_none()));
    }

    #[test]
    fn test_short_row_keeps_log() {
        let full = vec!["2.0"; 24].join(",");
        let csv = format!(
            "{}\n2021-09-01,B,@ B,3-1,{}\n2021-09-04,C,C,0-3,9.5,8.0\n",
            header(),
            full
        );
        let id = LogId::from_file_name("A-schedule-2021.csv");
        let log = ScheduleLog::from_reader(id, csv.as_bytes()).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.rows[0].opponent, "B");
        assert_eq!(log.rows[0].stats.get(Metric::Points, Window::Last3), Some(2.0));

        let short = &log.rows[1];
        assert_eq!(short.opponent, "C");
        assert_eq!(short.own_sets(), Some(0));
        assert_eq!(short.stats.get(Metric::Kills, Window::Season), Some(9.5));
        assert_eq!(short.stats.get(Metric::Kills, Window::Last3), Some(8.0));
        assert_eq!(short.stats.get(Metric::Errors, Window::Season), None);
        assert_eq!(short.stats.get(Metric::Points, Window::Last3), None);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "date,result\n2021-09-01,3-1\n";
        let id = LogId::from_file_name("Texas-schedule-2021.csv");
        let err = ScheduleLog::from_reader(id, csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            VolleyballError::MissingColumn { ref column, .. } if column == "opponent"
        ));
    }

    #[test]
    fn test_empty_log() {
        let id = LogId::from_file_name("Texas-schedule-2021.csv");
        let err = ScheduleLog::from_reader(id, "".as_bytes()).unwrap_err();
        assert!(matches!(err, VolleyballError::EmptyLog(_)));
    }
}
