use serde::{Deserialize, Serialize};

use super::roster::Player;
use crate::stats::{PlayerId, StatsError};

pub const MAX_ON_COURT: usize = 5;

/// Who is on the floor and who is on the bench.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lineup {
    on_court: Vec<PlayerId>,
    bench: Vec<PlayerId>,
}

impl Lineup {
    /// Starts with `starters` on the court and the rest of the roster on
    /// the bench, in roster order.
    pub fn new(roster: &[Player], starters: &[PlayerId]) -> Result<Self, StatsError> {
        if starters.len() > MAX_ON_COURT {
            return Err(StatsError::validation(format!(
                "at most {} players can start",
                MAX_ON_COURT
            )));
        }

        let mut on_court = Vec::with_capacity(starters.len());
        for starter in starters {
            if !roster.iter().any(|p| &p.id == starter) {
                return Err(StatsError::UnknownPlayer(starter.clone()));
            }
            if on_court.contains(starter) {
                return Err(StatsError::validation(format!(
                    "{} is listed as a starter twice",
                    starter
                )));
            }
            on_court.push(starter.clone());
        }

        let bench = roster
            .iter()
            .filter(|p| !on_court.contains(&p.id))
            .map(|p| p.id.clone())
            .collect();

        Ok(Self { on_court, bench })
    }

    pub fn on_court(&self) -> &[PlayerId] {
        &self.on_court
    }

    pub fn bench(&self) -> &[PlayerId] {
        &self.bench
    }

    /// Moves `from_bench` onto the court and `to_bench` off it.
    ///
    /// With both given the two trade places, the court player taking the
    /// bench player's bench slot. A bench player alone needs an open spot on
    /// the court. A court player alone goes to the front of the bench.
    pub fn swap(
        &mut self,
        from_bench: Option<&str>,
        to_bench: Option<&str>,
    ) -> Result<(), StatsError> {
        let court_index = to_bench
            .map(|id| {
                self.on_court
                    .iter()
                    .position(|p| p == id)
                    .ok_or_else(|| StatsError::validation(format!("{} is not on the court", id)))
            })
            .transpose()?;

        match from_bench {
            Some(id) => {
                let bench_index = self
                    .bench
                    .iter()
                    .position(|p| p == id)
                    .ok_or_else(|| StatsError::validation(format!("{} is not on the bench", id)))?;

                if court_index.is_none() && self.on_court.len() >= MAX_ON_COURT {
                    return Err(StatsError::validation(
                        "the court is full, choose a player to sub out",
                    ));
                }

                let incoming = self.bench.remove(bench_index);
                self.on_court.push(incoming);

                if let Some(court_index) = court_index {
                    let outgoing = self.on_court.remove(court_index);
                    self.bench.insert(bench_index, outgoing);
                }
            }
            None => {
                let court_index = court_index
                    .ok_or_else(|| StatsError::validation("no players given to swap"))?;
                let outgoing = self.on_court.remove(court_index);
                self.bench.insert(0, outgoing);
            }
        }

        Ok(())
    }

    /// Sends everyone to the bench, keeping court order at the front.
    pub fn clear_court(&mut self) {
        let mut bench = std::mem::take(&mut self.on_court);
        bench.append(&mut self.bench);
        self.bench = bench;
    }
}
