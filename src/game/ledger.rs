use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::stats::{
    PendingStat, RecordedGroup, ShootingSplits, StatCounts, StatEvent, StatKind, StatsError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerState {
    Empty,
    Active,
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotFilter {
    #[default]
    All,
    Makes,
    Misses,
}

impl ShotFilter {
    fn matches(self, event: &StatEvent) -> bool {
        match self {
            ShotFilter::All => true,
            ShotFilter::Makes => event.is_made_shot(),
            ShotFilter::Misses => !event.is_made_shot(),
        }
    }
}

/// The recorded stats of one game.
///
/// `entries` doubles as the undo stack. `counts` and `team_score` are
/// derived from it and only change inside `record`, `undo_last` and `clear`.
#[derive(Debug, Clone, Default)]
pub struct GameStatLedger {
    entries: Vec<RecordedGroup>,
    counts: StatCounts,
    team_score: u32,
    next_sequence: u64,
    finalized: bool,
}

impl GameStatLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LedgerState {
        if self.finalized {
            LedgerState::Finalized
        } else if self.entries.is_empty() {
            LedgerState::Empty
        } else {
            LedgerState::Active
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Commits `pending` and its staged children as one group. Nothing
    /// changes if the commit fails.
    pub fn record(&mut self, pending: PendingStat) -> Result<RecordedGroup, StatsError> {
        self.ensure_writable("record")?;

        let group = pending.commit(self.next_sequence)?;
        self.next_sequence = group
            .events()
            .map(|event| event.sequence() + 1)
            .max()
            .unwrap_or(self.next_sequence);

        for event in group.events() {
            self.counts.increment(event.kind());
            self.team_score += event.points_scored();
        }

        debug!(
            kind = %group.parent.kind(),
            player_id = %group.parent.player_id(),
            joined = group.children.len(),
            team_score = self.team_score,
            "Recorded stat"
        );

        self.entries.push(group.clone());
        Ok(group)
    }

    /// Removes the most recently recorded group. `Ok(None)` when there is
    /// nothing to undo.
    pub fn undo_last(&mut self) -> Result<Option<RecordedGroup>, StatsError> {
        self.ensure_writable("undo")?;

        let Some(group) = self.entries.pop() else {
            debug!("Nothing to undo");
            return Ok(None);
        };

        self.revert(&group);

        debug!(
            kind = %group.parent.kind(),
            player_id = %group.parent.player_id(),
            team_score = self.team_score,
            "Undid stat"
        );

        Ok(Some(group))
    }

    /// Drops every recorded group, oldest first in the returned list.
    pub fn clear(&mut self) -> Result<Vec<RecordedGroup>, StatsError> {
        self.ensure_writable("clear")?;

        let cleared = std::mem::take(&mut self.entries);
        self.counts = StatCounts::default();
        self.team_score = 0;

        debug!(groups = cleared.len(), "Cleared ledger");
        Ok(cleared)
    }

    pub(crate) fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn team_score(&self) -> u32 {
        self.team_score
    }

    pub fn counts(&self) -> &StatCounts {
        &self.counts
    }

    pub fn count_for(&self, kind: StatKind) -> u32 {
        self.counts.get(kind)
    }

    pub fn entries(&self) -> &[RecordedGroup] {
        &self.entries
    }

    /// Parents and joined children in recording order.
    pub fn events(&self) -> impl Iterator<Item = &StatEvent> {
        self.entries.iter().flat_map(RecordedGroup::events)
    }

    pub fn shots(&self, filter: ShotFilter) -> Vec<&StatEvent> {
        self.events()
            .filter(|event| event.kind() == StatKind::Shot)
            .filter(|event| filter.matches(event))
            .collect()
    }

    pub fn totals_for_player(&self, player_id: &str) -> StatCounts {
        let mut totals = StatCounts::default();
        for event in self.player_events(player_id) {
            totals.increment(event.kind());
        }
        totals
    }

    pub fn points_for_player(&self, player_id: &str) -> u32 {
        self.player_events(player_id)
            .map(StatEvent::points_scored)
            .sum()
    }

    /// Shooting lines for the whole team, or for one player.
    pub fn shooting_splits(&self, player_id: Option<&str>) -> ShootingSplits {
        ShootingSplits::from_shots(
            self.events()
                .filter(|event| player_id.map_or(true, |id| event.player_id() == id)),
        )
    }

    fn player_events<'a>(&'a self, player_id: &'a str) -> impl Iterator<Item = &'a StatEvent> {
        self.events()
            .filter(move |event| event.player_id() == player_id)
    }

    fn revert(&mut self, group: &RecordedGroup) {
        for event in group.events() {
            self.counts.decrement(event.kind());
            self.team_score = self.team_score.saturating_sub(event.points_scored());
        }
    }

    fn ensure_writable(&self, operation: &str) -> Result<(), StatsError> {
        if self.finalized {
            return Err(StatsError::invalid_state(format!(
                "cannot {} on a finished game",
                operation
            )));
        }
        Ok(())
    }
}
