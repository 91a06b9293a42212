//! Grouping of one-sided rows by game

use crate::data::schedule::ScheduleRow;
use crate::data::store::LogMap;
use crate::matching::key::GameKey;
use std::collections::BTreeMap;

/// One row in a game group, tagged with the team whose log it came from
#[derive(Debug, Clone, Copy)]
pub struct GroupEntry<'a> {
    pub team: &'a str,
    pub row: &'a ScheduleRow,
}

/// Rows bucketed by canonical game key, iterated in key order
#[derive(Debug, Default)]
pub struct GameGroups<'a> {
    groups: BTreeMap<GameKey, Vec<GroupEntry<'a>>>,
}

impl<'a> GameGroups<'a> {
    pub fn new() -> Self {
        GameGroups {
            groups: BTreeMap::new(),
        }
    }

    /// Group every row of every log
    pub fn collect(logs: &'a LogMap) -> Self {
        let mut groups = Self::new();
        for log in logs.values() {
            for row in &log.rows {
                groups.insert(log.team(), row);
            }
        }
        groups
    }

    /// Add a row from `team`'s log under its derived key
    pub fn insert(&mut self, team: &'a str, row: &'a ScheduleRow) {
        let key = GameKey::derive(&row.date, team, &row.opponent);
        self.groups
            .entry(key)
            .or_default()
            .push(GroupEntry { team, row });
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &GameKey) -> Option<&[GroupEntry<'a>]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GameKey, &[GroupEntry<'a>])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::RollingStats;

    fn row(own: &str, opponent: &str, date: &str) -> ScheduleRow {
        ScheduleRow {
            own_team: own.to_string(),
            opponent: opponent.to_string(),
            date: date.to_string(),
            result: "3-0".to_string(),
            opponent_venue: None,
            stats: RollingStats::default(),
        }
    }

    #[test]
    fn test_both_sides_share_a_group() {
        let a = row("A", "B", "2021-09-01");
        let b = row("B", "A", "2021-09-01");
        let c = row("B", "C", "2021-09-01");

        let mut groups = GameGroups::new();
        groups.insert("A", &a);
        groups.insert("B", &b);
        groups.insert("B", &c);

        assert_eq!(groups.len(), 2);
        let key = GameKey::derive("2021-09-01", "A", "B");
        let entries = groups.get(&key).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].team, "A");
        assert_eq!(entries[1].team, "B");
    }

    #[test]
    fn test_iteration_is_key_ordered() {
        let late = row("A", "B", "2021-10-01");
        let early = row("A", "B", "2021-09-01");

        let mut groups = GameGroups::new();
        groups.insert("A", &late);
        groups.insert("A", &early);

        let dates: Vec<_> = groups.iter().map(|(k, _)| k.date.as_str()).collect();
        assert_eq!(dates, vec!["2021-09-01", "2021-10-01"]);
    }
}
