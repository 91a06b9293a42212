//! Rolling statistic columns
//!
//! Fixed set of per-team rolling aggregates carried by every schedule row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rolling box-score metric tracked in the schedule logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Kills,
    Errors,
    TotalAttacks,
    HitPct,
    Assists,
    Aces,
    ServiceErrors,
    Digs,
    BlockSolo,
    BlockAssist,
    BlockError,
    Points,
}

impl Metric {
    /// All metrics in output column order
    pub const ALL: [Metric; 12] = [
        Metric::Kills,
        Metric::Errors,
        Metric::TotalAttacks,
        Metric::HitPct,
        Metric::Assists,
        Metric::Aces,
        Metric::ServiceErrors,
        Metric::Digs,
        Metric::BlockSolo,
        Metric::BlockAssist,
        Metric::BlockError,
        Metric::Points,
    ];

    /// Short name as it appears inside column names
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Kills => "kills",
            Metric::Errors => "errors",
            Metric::TotalAttacks => "total_attacks",
            Metric::HitPct => "hit_pct",
            Metric::Assists => "assists",
            Metric::Aces => "aces",
            Metric::ServiceErrors => "serr",
            Metric::Digs => "digs",
            Metric::BlockSolo => "b_solo",
            Metric::BlockAssist => "b_assist",
            Metric::BlockError => "b_error",
            Metric::Points => "pts",
        }
    }

    /// Column name in the schedule logs.
    ///
    /// Hitting percentage is the one metric logged without the `/set_` segment.
    pub fn column(&self, window: Window) -> &'static str {
        match (self, window) {
            (Metric::Kills, Window::Season) => "rolling_kills/set_total",
            (Metric::Kills, Window::Last3) => "rolling_kills/set_3",
            (Metric::Errors, Window::Season) => "rolling_errors/set_total",
            (Metric::Errors, Window::Last3) => "rolling_errors/set_3",
            (Metric::TotalAttacks, Window::Season) => "rolling_total_attacks/set_total",
            (Metric::TotalAttacks, Window::Last3) => "rolling_total_attacks/set_3",
            (Metric::HitPct, Window::Season) => "rolling_hit_pct_total",
            (Metric::HitPct, Window::Last3) => "rolling_hit_pct_3",
            (Metric::Assists, Window::Season) => "rolling_assists/set_total",
            (Metric::Assists, Window::Last3) => "rolling_assists/set_3",
            (Metric::Aces, Window::Season) => "rolling_aces/set_total",
            (Metric::Aces, Window::Last3) => "rolling_aces/set_3",
            (Metric::ServiceErrors, Window::Season) => "rolling_serr/set_total",
            (Metric::ServiceErrors, Window::Last3) => "rolling_serr/set_3",
            (Metric::Digs, Window::Season) => "rolling_digs/set_total",
            (Metric::Digs, Window::Last3) => "rolling_digs/set_3",
            (Metric::BlockSolo, Window::Season) => "rolling_b_solo/set_total",
            (Metric::BlockSolo, Window::Last3) => "rolling_b_solo/set_3",
            (Metric::BlockAssist, Window::Season) => "rolling_b_assist/set_total",
            (Metric::BlockAssist, Window::Last3) => "rolling_b_assist/set_3",
            (Metric::BlockError, Window::Season) => "rolling_b_error/set_total",
            (Metric::BlockError, Window::Last3) => "rolling_b_error/set_3",
            (Metric::Points, Window::Season) => "rolling_pts/set_total",
            (Metric::Points, Window::Last3) => "rolling_pts/set_3",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Averaging window of a rolling statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    /// Season-to-date cumulative average
    Season,
    /// Average over the previous three games (missing for a team's first games)
    Last3,
}

impl Window {
    pub const ALL: [Window; 2] = [Window::Season, Window::Last3];
}

/// Every stat column of a schedule log, in output order
pub fn stat_columns() -> impl Iterator<Item = (Metric, Window, &'static str)> {
    Metric::ALL.into_iter().flat_map(|metric| {
        Window::ALL
            .into_iter()
            .map(move |window| (metric, window, metric.column(window)))
    })
}

/// Number of stat columns per team
pub const STAT_COLUMN_COUNT: usize = Metric::ALL.len() * Window::ALL.len();

/// Season and three-game values of one metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatPair {
    pub season: Option<f64>,
    pub last3: Option<f64>,
}

impl StatPair {
    pub fn get(&self, window: Window) -> Option<f64> {
        match window {
            Window::Season => self.season,
            Window::Last3 => self.last3,
        }
    }

    fn slot_mut(&mut self, window: Window) -> &mut Option<f64> {
        match window {
            Window::Season => &mut self.season,
            Window::Last3 => &mut self.last3,
        }
    }
}

/// One team's rolling aggregates going into a game
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingStats {
    pub kills: StatPair,
    pub errors: StatPair,
    pub total_attacks: StatPair,
    pub hit_pct: StatPair,
    pub assists: StatPair,
    pub aces: StatPair,
    pub service_errors: StatPair,
    pub digs: StatPair,
    pub block_solo: StatPair,
    pub block_assist: StatPair,
    pub block_error: StatPair,
    pub points: StatPair,
}

impl RollingStats {
    /// Stats for a metric
    pub fn metric(&self, metric: Metric) -> &StatPair {
        match metric {
            Metric::Kills => &self.kills,
            Metric::Errors => &self.errors,
            Metric::TotalAttacks => &self.total_attacks,
            Metric::HitPct => &self.hit_pct,
            Metric::Assists => &self.assists,
            Metric::Aces => &self.aces,
            Metric::ServiceErrors => &self.service_errors,
            Metric::Digs => &self.digs,
            Metric::BlockSolo => &self.block_solo,
            Metric::BlockAssist => &self.block_assist,
            Metric::BlockError => &self.block_error,
            Metric::Points => &self.points,
        }
    }

    fn metric_mut(&mut self, metric: Metric) -> &mut StatPair {
        match metric {
            Metric::Kills => &mut self.kills,
            Metric::Errors => &mut self.errors,
            Metric::TotalAttacks => &mut self.total_attacks,
            Metric::HitPct => &mut self.hit_pct,
            Metric::Assists => &mut self.assists,
            Metric::Aces => &mut self.aces,
            Metric::ServiceErrors => &mut self.service_errors,
            Metric::Digs => &mut self.digs,
            Metric::BlockSolo => &mut self.block_solo,
            Metric::BlockAssist => &mut self.block_assist,
            Metric::BlockError => &mut self.block_error,
            Metric::Points => &mut self.points,
        }
    }

    pub fn get(&self, metric: Metric, window: Window) -> Option<f64> {
        self.metric(metric).get(window)
    }

    pub fn set(&mut self, metric: Metric, window: Window, value: Option<f64>) {
        *self.metric_mut(metric).slot_mut(window) = value;
    }

    /// All values in output column order
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        stat_columns().map(move |(metric, window, _)| self.get(metric, window))
    }

    /// True if any value is missing
    pub fn has_missing(&self) -> bool {
        self.values().any(|v| v.is_none())
    }

    /// Copy with every missing value replaced by `fill`
    pub fn filled(&self, fill: f64) -> Self {
        let mut out = *self;
        for (metric, window, _) in stat_columns() {
            let slot = out.metric_mut(metric).slot_mut(window);
            if slot.is_none() {
                *slot = Some(fill);
            }
        }
        out
    }
}

/// Parse a raw stat cell. Empty, `NaN` and non-numeric cells are missing.
pub fn parse_stat(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_column_names_unique() {
        let names: HashSet<_> = stat_columns().map(|(_, _, name)| name).collect();
        assert_eq!(names.len(), STAT_COLUMN_COUNT);
        assert_eq!(STAT_COLUMN_COUNT, 24);
    }

    #[test]
    fn test_hit_pct_has_no_set_segment() {
        assert_eq!(Metric::HitPct.column(Window::Season), "rolling_hit_pct_total");
        assert_eq!(Metric::HitPct.column(Window::Last3), "rolling_hit_pct_3");
        assert_eq!(Metric::Digs.column(Window::Season), "rolling_digs/set_total");
    }

    #[test]
    fn test_column_order() {
        let first: Vec<_> = stat_columns().take(8).map(|(_, _, name)| name).collect();
        assert_eq!(
            first,
            vec![
                "rolling_kills/set_total",
                "rolling_kills/set_3",
                "rolling_errors/set_total",
                "rolling_errors/set_3",
                "rolling_total_attacks/set_total",
                "rolling_total_attacks/set_3",
                "rolling_hit_pct_total",
                "rolling_hit_pct_3",
            ]
        );
    }

    #[test]
    fn test_parse_stat() {
        assert_eq!(parse_stat(" 12.5 "), Some(12.5));
        assert_eq!(parse_stat(""), None);
        assert_eq!(parse_stat("NaN"), None);
        assert_eq!(parse_stat("-"), None);
    }

    #[test]
    fn test_fill_missing() {
        let mut stats = RollingStats::default();
        stats.set(Metric::Kills, Window::Season, Some(13.1));
        assert!(stats.has_missing());

        let filled = stats.filled(0.0);
        assert!(!filled.has_missing());
        assert_eq!(filled.get(Metric::Kills, Window::Season), Some(13.1));
        assert_eq!(filled.get(Metric::Kills, Window::Last3), Some(0.0));
        // source stats unchanged
        assert_eq!(stats.get(Metric::Kills, Window::Last3), None);
    }
}
