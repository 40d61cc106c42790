use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Shot = 0,
    Rebound = 1,
    Steal = 2,
    Turnover = 3,
    Block = 4,
    Assist = 5,
    Foul = 6,
}

impl StatKind {
    pub fn abbreviation(self) -> &'static str {
        match self {
            StatKind::Shot => "SHOT",
            StatKind::Rebound => "REB",
            StatKind::Steal => "STL",
            StatKind::Turnover => "TO",
            StatKind::Block => "BLK",
            StatKind::Assist => "AST",
            StatKind::Foul => "FOUL",
        }
    }

    /// Whether a caller has to collect more input (make/miss, points,
    /// offensive/defensive) before the stat can be committed.
    pub fn requires_detail_entry(self) -> bool {
        matches!(self, StatKind::Shot | StatKind::Rebound)
    }

    /// Stats where a lower count is the better performance.
    pub fn is_negative(self) -> bool {
        matches!(self, StatKind::Foul | StatKind::Turnover)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// One counter per [`StatKind`], all present from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "BTreeMap<StatKind, u32>", from = "BTreeMap<StatKind, u32>")]
pub struct StatCounts([u32; StatKind::COUNT]);

impl StatCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: StatKind) -> u32 {
        self.0[kind.index()]
    }

    pub(crate) fn increment(&mut self, kind: StatKind) {
        self.0[kind.index()] += 1;
    }

    /// Floored at zero.
    pub(crate) fn decrement(&mut self, kind: StatKind) {
        let slot = &mut self.0[kind.index()];
        *slot = slot.saturating_sub(1);
    }

    pub(crate) fn add(&mut self, other: &StatCounts) {
        for kind in StatKind::iter() {
            self.0[kind.index()] += other.get(kind);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, u32)> + '_ {
        StatKind::iter().map(move |kind| (kind, self.get(kind)))
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Index<StatKind> for StatCounts {
    type Output = u32;

    fn index(&self, kind: StatKind) -> &Self::Output {
        &self.0[kind.index()]
    }
}

impl From<StatCounts> for BTreeMap<StatKind, u32> {
    fn from(counts: StatCounts) -> Self {
        counts.iter().collect()
    }
}

impl From<BTreeMap<StatKind, u32>> for StatCounts {
    fn from(map: BTreeMap<StatKind, u32>) -> Self {
        let mut counts = StatCounts::default();
        for (kind, count) in map {
            counts.0[kind.index()] = count;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StatKind::Shot, "SHOT", true)]
    #[case(StatKind::Rebound, "REB", true)]
    #[case(StatKind::Steal, "STL", false)]
    #[case(StatKind::Turnover, "TO", false)]
    #[case(StatKind::Block, "BLK", false)]
    #[case(StatKind::Assist, "AST", false)]
    #[case(StatKind::Foul, "FOUL", false)]
    fn test_kind_metadata(
        #[case] kind: StatKind,
        #[case] abbreviation: &str,
        #[case] requires_detail: bool,
    ) {
        assert_eq!(kind.abbreviation(), abbreviation);
        assert_eq!(kind.to_string(), abbreviation);
        assert_eq!(kind.requires_detail_entry(), requires_detail);
    }

    #[test]
    fn test_only_fouls_and_turnovers_are_negative() {
        let negative: Vec<StatKind> = StatKind::iter().filter(|k| k.is_negative()).collect();
        assert_eq!(negative, vec![StatKind::Turnover, StatKind::Foul]);
    }

    #[test]
    fn test_counts_start_at_zero_for_every_kind() {
        let counts = StatCounts::new();
        assert_eq!(counts.iter().count(), StatKind::COUNT);
        assert!(counts.iter().all(|(_, count)| count == 0));
        assert!(counts.is_empty());
    }

    #[test]
    fn test_decrement_is_floored_at_zero() {
        let mut counts = StatCounts::new();
        counts.decrement(StatKind::Steal);
        assert_eq!(counts[StatKind::Steal], 0);

        counts.increment(StatKind::Steal);
        counts.increment(StatKind::Steal);
        counts.decrement(StatKind::Steal);
        assert_eq!(counts.get(StatKind::Steal), 1);
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn test_counts_serialize_as_kind_map() {
        let mut counts = StatCounts::new();
        counts.increment(StatKind::Assist);

        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["assist"], 1);
        assert_eq!(json["foul"], 0);

        let parsed: StatCounts = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, counts);
    }
}
