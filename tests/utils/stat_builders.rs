#![allow(dead_code)]

use boxscore::stats::{CourtLocation, PendingStat, ShotValue, StatKind};

// ============================================================================
// Stat Builders
// ============================================================================

/// Fluent builder for shots and the stats joined to them
pub struct ShotBuilder {
    stat: PendingStat,
}

impl ShotBuilder {
    fn new(player: &str, made: bool, points: u8) -> Self {
        let mut stat = PendingStat::new(StatKind::Shot, player);
        stat.set_made_shot(made)
            .set_points(ShotValue::try_from(points).expect("valid shot value"));
        Self { stat }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.stat
            .set_shot_location(CourtLocation::new(x, y).expect("location on the court"));
        self
    }

    pub fn assisted_by(mut self, player: &str) -> Self {
        self.stat.set_assisted_by(Some(player.to_string()));
        self
    }

    pub fn rebounded_by(mut self, player: &str) -> Self {
        self.stat.set_rebounded_by(Some(player.to_string()));
        self
    }

    pub fn build(self) -> PendingStat {
        self.stat
    }
}

impl From<ShotBuilder> for PendingStat {
    fn from(builder: ShotBuilder) -> Self {
        builder.build()
    }
}

pub fn made(player: &str, points: u8) -> ShotBuilder {
    ShotBuilder::new(player, true, points)
}

pub fn missed(player: &str, points: u8) -> ShotBuilder {
    ShotBuilder::new(player, false, points)
}

pub fn steal(player: &str) -> PendingStat {
    PendingStat::new(StatKind::Steal, player)
}

pub fn foul(player: &str) -> PendingStat {
    PendingStat::new(StatKind::Foul, player)
}

pub fn rebound(player: &str, offensive: bool) -> PendingStat {
    let mut stat = PendingStat::new(StatKind::Rebound, player);
    stat.set_offensive_rebound(offensive);
    stat
}
