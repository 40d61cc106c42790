use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    ledger::{GameStatLedger, LedgerState},
    lineup::Lineup,
    roster::Team,
};
use crate::stats::{PendingStat, PlayerId, RecordedGroup, StatCounts, StatsError};

const DEFAULT_OPPONENT_NAME: &str = "Opponent";
const OPPONENT_SCORE_ADJUSTMENTS: [i32; 4] = [-1, 1, 2, 3];

/// One game being tracked: the stat ledger plus everything around it that
/// decides whether the game is still running.
#[derive(Debug, Clone)]
pub struct LiveGame {
    id: Uuid,
    team: Team,
    opponent_name: String,
    opponent_score: u32,
    lineup: Lineup,
    ledger: GameStatLedger,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

/// Point-in-time view of a game, safe to hand to other components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: Uuid,
    pub team_id: String,
    pub team_name: String,
    pub opponent_name: String,
    pub team_score: u32,
    pub opponent_score: u32,
    pub state: LedgerState,
    pub counts: StatCounts,
    pub on_court: Vec<PlayerId>,
    pub bench: Vec<PlayerId>,
    pub opponent_score_options: Vec<i32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl LiveGame {
    pub fn new(
        team: Team,
        opponent_name: Option<String>,
        starters: &[PlayerId],
    ) -> Result<Self, StatsError> {
        let lineup = Lineup::new(&team.players, starters)?;
        let opponent_name = opponent_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_OPPONENT_NAME.to_string());

        Ok(Self {
            id: Uuid::new_v4(),
            team,
            opponent_name,
            opponent_score: 0,
            lineup,
            ledger: GameStatLedger::new(),
            started_at: Utc::now(),
            ended_at: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn opponent_name(&self) -> &str {
        &self.opponent_name
    }

    pub fn team_score(&self) -> u32 {
        self.ledger.team_score()
    }

    pub fn opponent_score(&self) -> u32 {
        self.opponent_score
    }

    pub fn ledger(&self) -> &GameStatLedger {
        &self.ledger
    }

    pub fn lineup(&self) -> &Lineup {
        &self.lineup
    }

    pub fn is_complete(&self) -> bool {
        self.ledger.is_finalized()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Records a stat after checking every credited player is on the roster.
    pub fn record(&mut self, pending: PendingStat) -> Result<RecordedGroup, StatsError> {
        if let Some(unknown) = pending
            .credited_players()
            .find(|id| !self.team.has_player(id))
        {
            return Err(StatsError::UnknownPlayer(unknown.to_string()));
        }
        self.ledger.record(pending)
    }

    pub fn undo_last(&mut self) -> Result<Option<RecordedGroup>, StatsError> {
        self.ledger.undo_last()
    }

    /// Score adjustments that keep the opponent at zero or above.
    pub fn opponent_score_options(&self) -> Vec<i32> {
        OPPONENT_SCORE_ADJUSTMENTS
            .into_iter()
            .filter(|delta| i64::from(self.opponent_score) + i64::from(*delta) >= 0)
            .collect()
    }

    pub fn adjust_opponent_score(&mut self, delta: i32) -> Result<u32, StatsError> {
        self.ensure_running()?;

        let updated = i64::from(self.opponent_score) + i64::from(delta);
        let updated = u32::try_from(updated).map_err(|_| {
            StatsError::validation(format!(
                "opponent score cannot go from {} by {}",
                self.opponent_score, delta
            ))
        })?;

        self.opponent_score = updated;
        debug!(game_id = %self.id, opponent_score = updated, "Opponent score adjusted");
        Ok(updated)
    }

    pub fn swap_players(
        &mut self,
        from_bench: Option<&str>,
        to_bench: Option<&str>,
    ) -> Result<(), StatsError> {
        self.ensure_running()?;
        self.lineup.swap(from_bench, to_bench)
    }

    /// Ends the game. The ledger becomes read-only and the court is cleared.
    pub fn complete(&mut self) -> Result<(), StatsError> {
        self.ensure_running()?;

        self.ledger.finalize();
        self.lineup.clear_court();
        self.ended_at = Some(Utc::now());

        info!(
            game_id = %self.id,
            team_score = self.team_score(),
            opponent_score = self.opponent_score,
            "Game completed"
        );
        Ok(())
    }

    /// Starts the game over, returning the stats that were dropped.
    pub fn restart(&mut self) -> Result<Vec<RecordedGroup>, StatsError> {
        let cleared = self.ledger.clear()?;
        self.opponent_score = 0;
        self.started_at = Utc::now();

        info!(game_id = %self.id, dropped = cleared.len(), "Game restarted");
        Ok(cleared)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            game_id: self.id,
            team_id: self.team.id.clone(),
            team_name: self.team.name.clone(),
            opponent_name: self.opponent_name.clone(),
            team_score: self.team_score(),
            opponent_score: self.opponent_score,
            state: self.ledger.state(),
            counts: *self.ledger.counts(),
            on_court: self.lineup.on_court().to_vec(),
            bench: self.lineup.bench().to_vec(),
            opponent_score_options: self.opponent_score_options(),
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    fn ensure_running(&self) -> Result<(), StatsError> {
        if self.is_complete() {
            return Err(StatsError::invalid_state("game has already ended"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::roster::Player;
    use crate::stats::{ShotValue, StatKind};

    fn team() -> Team {
        Team {
            id: "team-1".to_string(),
            name: "Owls".to_string(),
            players: ["alice", "bob", "carol"]
                .iter()
                .enumerate()
                .map(|(i, id)| Player {
                    id: id.to_string(),
                    first_name: id.to_string(),
                    last_name: "Test".to_string(),
                    number: i as u32,
                })
                .collect(),
        }
    }

    fn game() -> LiveGame {
        LiveGame::new(team(), None, &["alice".to_string()]).unwrap()
    }

    fn made_two(player: &str) -> PendingStat {
        let mut stat = PendingStat::new(StatKind::Shot, player);
        stat.set_made_shot(true).set_points(ShotValue::Two);
        stat
    }

    #[test]
    fn test_defaults_opponent_name() {
        let game = LiveGame::new(team(), Some("   ".to_string()), &[]).unwrap();
        assert_eq!(game.opponent_name(), "Opponent");

        let named = LiveGame::new(team(), Some("Hawks".to_string()), &[]).unwrap();
        assert_eq!(named.opponent_name(), "Hawks");
    }

    #[test]
    fn test_record_rejects_off_roster_shooter() {
        let mut game = game();
        let result = game.record(made_two("zed"));
        assert_eq!(result, Err(StatsError::UnknownPlayer("zed".to_string())));
        assert_eq!(game.team_score(), 0);
    }

    #[test]
    fn test_record_rejects_off_roster_assister() {
        let mut game = game();
        let mut shot = made_two("alice");
        shot.set_assisted_by(Some("zed".to_string()));

        assert!(matches!(game.record(shot), Err(StatsError::UnknownPlayer(_))));
        assert!(game.ledger().entries().is_empty());
    }

    #[test]
    fn test_opponent_score_options_stay_non_negative() {
        let mut game = game();
        assert_eq!(game.opponent_score_options(), vec![1, 2, 3]);

        game.adjust_opponent_score(2).unwrap();
        assert_eq!(game.opponent_score_options(), vec![-1, 1, 2, 3]);
        assert_eq!(game.adjust_opponent_score(-1), Ok(1));
    }

    #[test]
    fn test_opponent_score_cannot_go_negative() {
        let mut game = game();
        let result = game.adjust_opponent_score(-1);
        assert!(matches!(result, Err(StatsError::Validation(_))));
        assert_eq!(game.opponent_score(), 0);
    }

    #[test]
    fn test_complete_finalizes_and_clears_court() {
        let mut game = game();
        game.record(made_two("alice")).unwrap();
        game.complete().unwrap();

        assert!(game.is_complete());
        assert!(game.ended_at().is_some());
        assert!(game.lineup().on_court().is_empty());
        assert_eq!(game.summary().state, LedgerState::Finalized);
        assert_eq!(game.team_score(), 2);

        assert!(matches!(game.complete(), Err(StatsError::InvalidState(_))));
        assert!(matches!(game.record(made_two("bob")), Err(StatsError::InvalidState(_))));
        assert!(matches!(game.undo_last(), Err(StatsError::InvalidState(_))));
        assert!(matches!(game.adjust_opponent_score(1), Err(StatsError::InvalidState(_))));
        assert!(matches!(game.restart(), Err(StatsError::InvalidState(_))));
    }

    #[test]
    fn test_restart_clears_stats_and_opponent_score() {
        let mut game = game();
        game.record(made_two("alice")).unwrap();
        game.adjust_opponent_score(3).unwrap();

        let dropped = game.restart().unwrap();
        assert_eq!(dropped.len(), 1);
        assert_eq!(game.team_score(), 0);
        assert_eq!(game.opponent_score(), 0);
        assert_eq!(game.summary().state, LedgerState::Empty);
    }

    #[test]
    fn test_summary_reflects_ledger() {
        let mut game = game();
        game.record(made_two("bob")).unwrap();
        game.swap_players(Some("bob"), None).unwrap();

        let summary = game.summary();
        assert_eq!(summary.team_score, 2);
        assert_eq!(summary.counts.get(StatKind::Shot), 1);
        assert_eq!(summary.on_court, vec!["alice".to_string(), "bob".to_string()]);
        assert_eq!(summary.bench, vec!["carol".to_string()]);
        assert_eq!(summary.state, LedgerState::Active);
    }
}
