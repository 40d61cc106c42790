use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{StatKind, StatsError};

pub type PlayerId = String;

/// Points a shot is worth when it goes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ShotValue {
    FreeThrow = 1,
    Two = 2,
    Three = 3,
}

impl ShotValue {
    pub fn points(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u8> for ShotValue {
    type Error = StatsError;

    fn try_from(points: u8) -> Result<Self, Self::Error> {
        match points {
            1 => Ok(ShotValue::FreeThrow),
            2 => Ok(ShotValue::Two),
            3 => Ok(ShotValue::Three),
            _ => Err(StatsError::validation(format!(
                "shot points must be 1, 2 or 3, got {}",
                points
            ))),
        }
    }
}

impl From<ShotValue> for u8 {
    fn from(value: ShotValue) -> Self {
        value as u8
    }
}

/// A shot location as a fraction of the half-court width (`x`) and
/// height (`y`), independent of any screen size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CourtLocation {
    x: f64,
    y: f64,
}

impl CourtLocation {
    pub fn new(x: f64, y: f64) -> Result<Self, StatsError> {
        let in_range = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_range(x) || !in_range(y) {
            return Err(StatsError::validation(format!(
                "shot location ({}, {}) is outside the normalized court",
                x, y
            )));
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

impl<'de> Deserialize<'de> for CourtLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            x: f64,
            y: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        CourtLocation::new(raw.x, raw.y).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotDetail {
    pub made: bool,
    pub value: ShotValue,
    pub location: Option<CourtLocation>,
}

impl ShotDetail {
    pub fn points_scored(&self) -> u32 {
        if self.made {
            self.value.points()
        } else {
            0
        }
    }
}

/// Kind-specific attributes of a committed stat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StatDetail {
    Shot(ShotDetail),
    Rebound { offensive: bool },
    Steal,
    Turnover,
    Block,
    Assist,
    Foul,
}

impl StatDetail {
    pub fn kind(&self) -> StatKind {
        match self {
            StatDetail::Shot(_) => StatKind::Shot,
            StatDetail::Rebound { .. } => StatKind::Rebound,
            StatDetail::Steal => StatKind::Steal,
            StatDetail::Turnover => StatKind::Turnover,
            StatDetail::Block => StatKind::Block,
            StatDetail::Assist => StatKind::Assist,
            StatDetail::Foul => StatKind::Foul,
        }
    }
}

/// A committed, immutable stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEvent {
    id: Uuid,
    sequence: u64,
    player_id: PlayerId,
    recorded_at: DateTime<Utc>,
    detail: StatDetail,
}

impl StatEvent {
    pub(crate) fn new(
        sequence: u64,
        player_id: PlayerId,
        recorded_at: DateTime<Utc>,
        detail: StatDetail,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            player_id,
            recorded_at,
            detail,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn detail(&self) -> &StatDetail {
        &self.detail
    }

    pub fn kind(&self) -> StatKind {
        self.detail.kind()
    }

    pub fn shot(&self) -> Option<&ShotDetail> {
        match &self.detail {
            StatDetail::Shot(shot) => Some(shot),
            _ => None,
        }
    }

    pub fn is_made_shot(&self) -> bool {
        self.shot().is_some_and(|shot| shot.made)
    }

    pub fn points_scored(&self) -> u32 {
        self.shot().map(ShotDetail::points_scored).unwrap_or_default()
    }
}

/// A committed stat together with the joined stats generated alongside it.
/// Recorded and undone as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedGroup {
    pub parent: StatEvent,
    pub children: Vec<StatEvent>,
}

impl RecordedGroup {
    pub fn events(&self) -> impl Iterator<Item = &StatEvent> {
        std::iter::once(&self.parent).chain(self.children.iter())
    }

    pub fn points_scored(&self) -> u32 {
        self.events().map(StatEvent::points_scored).sum()
    }
}
