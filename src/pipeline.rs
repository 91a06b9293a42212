//! Head-to-head build pipeline
//!
//! Schedule logs → game groups → validated pairs → flattened records → table.

use crate::data::store::{LoadReport, LogMap, LogStore};
use crate::matching::{resolve, GameGroups, RejectionKind};
use crate::table::{HeadToHeadRecord, HeadToHeadTable, MissingPolicy};
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Tally of how game groups were resolved
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    /// Distinct game keys seen
    pub groups: usize,
    /// Groups that became records
    pub accepted: usize,
    pub rejected: BTreeMap<RejectionKind, usize>,
    /// Records removed by the drop policy
    pub dropped_missing: usize,
}

impl MatchReport {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

/// Everything a build produced besides the table
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub load: LoadReport,
    pub matching: MatchReport,
    pub policy: MissingPolicy,
}

/// Build the head-to-head table from every schedule log under `dir`.
///
/// Fails before reading anything if both missing-value policies are requested.
/// Returns the table and the raw logs keyed by file name.
pub fn build_head_to_head<P: AsRef<Path>>(
    dir: P,
    drop_missing: bool,
    fill_missing: bool,
) -> Result<(HeadToHeadTable, LogMap)> {
    let (table, logs, _) = build_with_report(dir, drop_missing, fill_missing)?;
    Ok((table, logs))
}

/// Same as [`build_head_to_head`], also returning the build report
pub fn build_with_report<P: AsRef<Path>>(
    dir: P,
    drop_missing: bool,
    fill_missing: bool,
) -> Result<(HeadToHeadTable, LogMap, BuildReport)> {
    let policy = MissingPolicy::from_flags(drop_missing, fill_missing)?;

    let (logs, load) = LogStore::new(dir).load()?;
    let (table, matching) = build_from_logs(&logs, policy)?;

    let report = BuildReport {
        load,
        matching,
        policy,
    };
    Ok((table, logs, report))
}

/// Run matching and assembly over already-loaded logs
pub fn build_from_logs(logs: &LogMap, policy: MissingPolicy) -> Result<(HeadToHeadTable, MatchReport)> {
    let groups = GameGroups::collect(logs);
    let mut report = MatchReport {
        groups: groups.len(),
        ..Default::default()
    };

    // fresh accumulator per build
    let mut records = Vec::new();
    for (key, entries) in groups.iter() {
        match resolve(key, entries) {
            Ok(pair) => records.push(HeadToHeadRecord::flatten(&pair)),
            Err(rejection) => {
                log::debug!("Skipping game {}: {}", key, rejection);
                *report.rejected.entry(rejection.kind()).or_default() += 1;
            }
        }
    }
    report.accepted = records.len();

    let table = HeadToHeadTable::assemble(records, policy)?;
    report.dropped_missing = report.accepted - table.len();

    log::info!(
        "Matched {} of {} games ({} rejected, {} dropped for missing stats, policy {})",
        table.len(),
        report.groups,
        report.rejected_total(),
        report.dropped_missing,
        policy
    );

    Ok((table, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::{stat_columns, Metric, Window};
    use crate::VolleyballError;
    use std::fs;

    fn header() -> String {
        let mut cols = vec!["date", "opponent", "opponent/venue", "result"];
        cols.extend(stat_columns().map(|(_, _, name)| name));
        cols.join(",")
    }

    /// One log line; every stat is `base`, except season digs which is `digs`
    fn line(date: &str, opponent: &str, venue: &str, result: &str, base: &str, digs: &str) -> String {
        let stats: Vec<&str> = stat_columns()
            .map(|(metric, window, _)| {
                if metric == Metric::Digs && window == Window::Season {
                    digs
                } else {
                    base
                }
            })
            .collect();
        format!("{},{},{},{},{}", date, opponent, venue, result, stats.join(","))
    }

    fn write_log(dir: &Path, name: &str, lines: &[String]) {
        let mut text = header();
        for l in lines {
            text.push('\n');
            text.push_str(l);
        }
        text.push('\n');
        fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn test_round_trip_two_logs() {
        let dir = tempfile::tempdir().unwrap();
        write_log(
            dir.path(),
            "A-schedule-2021.csv",
            &[line("2021-09-01", "B", "B", "3-1", "1.0", "14.5")],
        );
        write_log(
            dir.path(),
            "B-schedule-2021.csv",
            &[line("2021-09-01", "A", "@ A", "1-3", "2.0", "15.5")],
        );

        let (table, logs) = build_head_to_head(dir.path(), false, false).unwrap();

        assert_eq!(logs.len(), 2);
        assert!(logs.contains_key("A-schedule-2021.csv"));
        assert_eq!(table.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.t1, "B");
        assert_eq!(row.t2, "A");
        // result is read from B's row (1-3), so team 2 (A) won
        assert_eq!(row.result, 1);
        assert_eq!(row.t1_stats.get(Metric::Digs, Window::Season), Some(15.5));
        assert_eq!(row.t2_stats.get(Metric::Digs, Window::Season), Some(14.5));
        assert_eq!((row.t1_code, row.t2_code), (1, 0));
    }

    #[test]
    fn test_team1_winner() {
        let dir = tempfile::tempdir().unwrap();
        write_log(
            dir.path(),
            "A-schedule-2021.csv",
            &[line("2021-09-01", "B", "B", "1-3", "1.0", "14.5")],
        );
        write_log(
            dir.path(),
            "B-schedule-2021.csv",
            &[line("2021-09-01", "A", "@ A", "3-1", "2.0", "15.5")],
        );

        let (table, _) = build_head_to_head(dir.path(), false, false).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].t1, "B");
        assert_eq!(table.rows[0].t2, "A");
        assert_eq!(table.rows[0].result, 0);
    }

    #[test]
    fn test_double_win_produces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_log(
            dir.path(),
            "A-schedule-2021.csv",
            &[line("2021-09-01", "B", "B", "3-0", "1.0", "14.5")],
        );
        write_log(
            dir.path(),
            "B-schedule-2021.csv",
            &[line("2021-09-01", "A", "@ A", "3-0", "2.0", "15.5")],
        );

        let (table, _, report) = build_with_report(dir.path(), false, false).unwrap();
        assert!(table.is_empty());
        assert_eq!(report.matching.rejected[&RejectionKind::DoubleWin], 1);
    }

    #[test]
    fn test_both_policies_rejected_before_io() {
        let err = build_head_to_head("/definitely/not/a/dir", true, true).unwrap_err();
        assert!(matches!(err, VolleyballError::InvalidArgument(_)));
    }

    #[test]
    fn test_unpaired_games_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write_log(
            dir.path(),
            "A-schedule-2021.csv",
            &[
                line("2021-09-01", "B", "B", "3-1", "1.0", "14.5"),
                line("2021-09-03", "C", "C", "3-2", "1.0", "14.0"),
            ],
        );
        write_log(
            dir.path(),
            "B-schedule-2021.csv",
            &[line("2021-09-01", "A", "@ A", "1-3", "2.0", "15.5")],
        );

        let (table, _, report) = build_with_report(dir.path(), false, false).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(report.matching.groups, 2);
        assert_eq!(report.matching.rejected[&RejectionKind::Cardinality], 1);
    }

    #[test]
    fn test_missing_value_policies() {
        let dir = tempfile::tempdir().unwrap();
        write_log(
            dir.path(),
            "A-schedule-2021.csv",
            &[
                line("2021-09-01", "B", "B", "3-1", "", "14.5"),
                line("2021-09-20", "B", "@ B", "3-1", "1.0", "16.0"),
            ],
        );
        write_log(
            dir.path(),
            "B-schedule-2021.csv",
            &[
                line("2021-09-01", "A", "@ A", "1-3", "2.0", "15.5"),
                line("2021-09-20", "A", "A", "1-3", "2.0", "17.0"),
            ],
        );

        let (kept, _) = build_head_to_head(dir.path(), false, false).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.rows[0].t2_stats.get(Metric::Kills, Window::Last3), None);

        let (filled, _) = build_head_to_head(dir.path(), false, true).unwrap();
        assert_eq!(filled.len(), 2);
        assert_eq!(filled.rows[0].t2_stats.get(Metric::Kills, Window::Last3), Some(0.0));
        assert_eq!(filled.missing_cells(), 0);

        let (dropped, _, report) = build_with_report(dir.path(), true, false).unwrap();
        assert_eq!(dropped.len(), 1);
        assert_eq!(report.matching.dropped_missing, 1);
        assert_eq!(dropped.rows[0].date.to_string(), "2021-09-20");
    }

    #[test]
    fn test_empty_log_is_excluded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("C-schedule-2021.csv"), "").unwrap();
        write_log(
            dir.path(),
            "A-schedule-2021.csv",
            &[line("2021-09-01", "B", "B", "3-1", "1.0", "14.5")],
        );

        let (table, logs, report) = build_with_report(dir.path(), false, false).unwrap();
        assert!(table.is_empty());
        assert_eq!(logs.len(), 1);
        assert_eq!(report.load.skipped.len(), 1);
    }
}
