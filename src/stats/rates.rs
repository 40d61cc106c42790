use serde::{Deserialize, Serialize};

use super::{ShotValue, StatEvent};

/// Division that yields zero instead of NaN or infinity when there is
/// nothing to divide by.
pub fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn per_game(total: u32, games: u32) -> f64 {
    safe_divide(total.into(), games.into())
}

/// Makes over attempts, out of 100.
pub fn percentage(makes: u32, attempts: u32) -> f64 {
    safe_divide(f64::from(makes) * 100.0, attempts.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShootingLine {
    pub makes: u32,
    pub attempts: u32,
}

impl ShootingLine {
    pub fn percentage(&self) -> f64 {
        percentage(self.makes, self.attempts)
    }

    fn add(&mut self, made: bool) {
        self.attempts += 1;
        if made {
            self.makes += 1;
        }
    }
}

/// Box-score shooting lines. Field goals cover twos and threes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShootingSplits {
    pub three_point: ShootingLine,
    pub field_goal: ShootingLine,
    pub free_throw: ShootingLine,
}

impl ShootingSplits {
    pub fn from_shots<'a>(events: impl IntoIterator<Item = &'a StatEvent>) -> Self {
        let mut splits = Self::default();
        for shot in events.into_iter().filter_map(StatEvent::shot) {
            match shot.value {
                ShotValue::FreeThrow => splits.free_throw.add(shot.made),
                ShotValue::Two => splits.field_goal.add(shot.made),
                ShotValue::Three => {
                    splits.three_point.add(shot.made);
                    splits.field_goal.add(shot.made);
                }
            }
        }
        splits
    }
}
