use serde::{Deserialize, Serialize};

use super::{ledger::ShotFilter, roster::Team};
use crate::stats::{
    CourtLocation, PendingStat, PlayerId, ShootingSplits, ShotValue, StatCounts, StatKind,
    StatsError,
};

#[derive(Debug, Clone, Deserialize)]
pub struct StartGameRequest {
    pub team: Team,
    #[serde(default)]
    pub opponent_name: Option<String>,
    #[serde(default)]
    pub starters: Vec<PlayerId>,
}

/// A stat as entered by a client. Joined stats are given by player id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordStatRequest {
    pub kind: Option<StatKind>,
    pub player_id: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub made: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<CourtLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offensive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assisted_by: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebounded_by: Option<PlayerId>,
}

impl TryFrom<RecordStatRequest> for PendingStat {
    type Error = StatsError;

    fn try_from(request: RecordStatRequest) -> Result<Self, Self::Error> {
        let kind = request
            .kind
            .ok_or_else(|| StatsError::validation("stat kind is required"))?;
        if request.player_id.trim().is_empty() {
            return Err(StatsError::validation("player id is required"));
        }

        let mut pending = PendingStat::new(kind, request.player_id);
        if let Some(made) = request.made {
            pending.set_made_shot(made);
        }
        if let Some(points) = request.points {
            pending.set_points(ShotValue::try_from(points)?);
        }
        if let Some(location) = request.location {
            pending.set_shot_location(location);
        }
        if let Some(offensive) = request.offensive {
            pending.set_offensive_rebound(offensive);
        }
        pending
            .set_assisted_by(request.assisted_by)
            .set_rebounded_by(request.rebounded_by);

        pending.validate()?;
        Ok(pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentScoreRequest {
    pub delta: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineupRequest {
    #[serde(default)]
    pub from_bench: Option<PlayerId>,
    #[serde(default)]
    pub to_bench: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ShotQuery {
    #[serde(default)]
    pub filter: ShotFilter,
}

/// One player's line for a single game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameTotals {
    pub player_id: PlayerId,
    pub points: u32,
    pub counts: StatCounts,
    pub shooting: ShootingSplits,
}
