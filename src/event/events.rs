use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::GameSummary;
use crate::stats::{PlayerId, RecordedGroup};

/// Things that have happened to a live game.
///
/// Emitted after the game's state has changed, so subscribers only ever
/// see facts and never need to roll anything back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A game was created and is ready to record stats
    GameStarted {
        game_id: Uuid,
        team_id: String,
        opponent_name: String,
    },

    /// A stat and its joined stats were committed
    StatRecorded {
        game_id: Uuid,
        group: RecordedGroup,
        team_score: u32,
    },

    /// The most recent stat group was undone
    StatUndone {
        game_id: Uuid,
        group: RecordedGroup,
        team_score: u32,
    },

    OpponentScoreChanged { game_id: Uuid, opponent_score: u32 },

    LineupChanged {
        game_id: Uuid,
        on_court: Vec<PlayerId>,
        bench: Vec<PlayerId>,
    },

    /// Every recorded stat was dropped
    GameRestarted {
        game_id: Uuid,
        dropped: Vec<RecordedGroup>,
    },

    /// The game ended and its stats are now read-only
    GameCompleted { game_id: Uuid, summary: GameSummary },

    /// The game was discarded along with everything recorded for it
    GameDeleted { game_id: Uuid },
}

impl GameEvent {
    pub fn game_id(&self) -> Uuid {
        match self {
            GameEvent::GameStarted { game_id, .. } => *game_id,
            GameEvent::StatRecorded { game_id, .. } => *game_id,
            GameEvent::StatUndone { game_id, .. } => *game_id,
            GameEvent::OpponentScoreChanged { game_id, .. } => *game_id,
            GameEvent::LineupChanged { game_id, .. } => *game_id,
            GameEvent::GameRestarted { game_id, .. } => *game_id,
            GameEvent::GameCompleted { game_id, .. } => *game_id,
            GameEvent::GameDeleted { game_id } => *game_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::StatRecorded { .. } => "stat_recorded",
            GameEvent::StatUndone { .. } => "stat_undone",
            GameEvent::OpponentScoreChanged { .. } => "opponent_score_changed",
            GameEvent::LineupChanged { .. } => "lineup_changed",
            GameEvent::GameRestarted { .. } => "game_restarted",
            GameEvent::GameCompleted { .. } => "game_completed",
            GameEvent::GameDeleted { .. } => "game_deleted",
        }
    }
}
