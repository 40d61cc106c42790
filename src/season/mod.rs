// Season view: combines finished games into per-game averages.
//
// Every rate here goes through `safe_divide`, so a team with no finished
// games reports zeros rather than NaN.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::game::LiveGame;
use crate::stats::{per_game, PlayerId, ShootingSplits, StatCounts, StatKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

/// Best per-game average for one kind of stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
    pub kind: StatKind,
    pub title: String,
    pub player_id: PlayerId,
    pub player_name: Option<String>,
    pub per_game: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub team_id: String,
    pub games_played: u32,
    pub record: SeasonRecord,
    pub points_per_game: f64,
    pub opponent_points_per_game: f64,
    pub per_game: BTreeMap<StatKind, f64>,
    pub shooting: ShootingSplits,
    pub top_performers: Vec<TopPerformer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonAverages {
    pub player_id: PlayerId,
    pub games_played: u32,
    pub points_per_game: f64,
    pub per_game: BTreeMap<StatKind, f64>,
    pub shooting: ShootingSplits,
}

impl SeasonSummary {
    /// Summarizes the completed games among `games`. Games still running
    /// are ignored.
    pub fn from_games<'a>(
        team_id: &str,
        games: impl IntoIterator<Item = &'a LiveGame>,
    ) -> Self {
        let finished: Vec<&LiveGame> = games
            .into_iter()
            .filter(|game| game.is_complete() && game.team().id == team_id)
            .collect();
        let games_played = finished.len() as u32;

        let mut record = SeasonRecord::default();
        let mut points = 0;
        let mut opponent_points = 0;
        let mut counts = StatCounts::default();
        let mut player_counts: BTreeMap<&str, StatCounts> = BTreeMap::new();
        let mut player_points: BTreeMap<&str, u32> = BTreeMap::new();

        for game in &finished {
            let (us, them) = (game.team_score(), game.opponent_score());
            match us.cmp(&them) {
                std::cmp::Ordering::Greater => record.wins += 1,
                std::cmp::Ordering::Less => record.losses += 1,
                std::cmp::Ordering::Equal => record.ties += 1,
            }
            points += us;
            opponent_points += them;
            counts.add(game.ledger().counts());

            for event in game.ledger().events() {
                player_counts
                    .entry(event.player_id())
                    .or_default()
                    .increment(event.kind());
                *player_points.entry(event.player_id()).or_default() += event.points_scored();
            }
        }

        let top_performers = StatKind::iter()
            .filter_map(|kind| {
                top_performer(kind, &player_counts, &player_points).map(|(player_id, total)| {
                    let player_name = finished
                        .iter()
                        .find_map(|game| game.team().player(player_id))
                        .map(|player| player.name_first_last());
                    TopPerformer {
                        kind,
                        title: performer_title(kind).to_string(),
                        player_id: player_id.to_string(),
                        player_name,
                        per_game: per_game(total, games_played),
                    }
                })
            })
            .collect();

        Self {
            team_id: team_id.to_string(),
            games_played,
            record,
            points_per_game: per_game(points, games_played),
            opponent_points_per_game: per_game(opponent_points, games_played),
            per_game: per_game_map(&counts, games_played),
            shooting: ShootingSplits::from_shots(
                finished.iter().flat_map(|game| game.ledger().events()),
            ),
            top_performers,
        }
    }
}

impl PlayerSeasonAverages {
    /// Averages over every completed game in `games`, whether or not the
    /// player recorded a stat in it.
    pub fn from_games<'a>(
        player_id: &str,
        games: impl IntoIterator<Item = &'a LiveGame>,
    ) -> Self {
        let finished: Vec<&LiveGame> = games
            .into_iter()
            .filter(|game| game.is_complete())
            .collect();
        let games_played = finished.len() as u32;

        let mut counts = StatCounts::default();
        let mut points = 0;
        for game in &finished {
            counts.add(&game.ledger().totals_for_player(player_id));
            points += game.ledger().points_for_player(player_id);
        }

        let shooting = ShootingSplits::from_shots(
            finished
                .iter()
                .flat_map(|game| game.ledger().events())
                .filter(|event| event.player_id() == player_id),
        );

        Self {
            player_id: player_id.to_string(),
            games_played,
            points_per_game: per_game(points, games_played),
            per_game: per_game_map(&counts, games_played),
            shooting,
        }
    }
}

fn per_game_map(counts: &StatCounts, games: u32) -> BTreeMap<StatKind, f64> {
    counts
        .iter()
        .map(|(kind, total)| (kind, per_game(total, games)))
        .collect()
}

fn performer_title(kind: StatKind) -> &'static str {
    match kind {
        StatKind::Shot => "PTS",
        other => other.abbreviation(),
    }
}

/// Picks the leader for `kind` among players who recorded at least one.
/// Shots rank by points. Negative stats rank lowest first. Ties go to the
/// smallest player id.
fn top_performer<'a>(
    kind: StatKind,
    player_counts: &BTreeMap<&'a str, StatCounts>,
    player_points: &BTreeMap<&'a str, u32>,
) -> Option<(&'a str, u32)> {
    let candidates: BTreeSet<(&'a str, u32)> = player_counts
        .iter()
        .filter(|(_, counts)| counts.get(kind) > 0)
        .map(|(player_id, counts)| {
            let total = if kind == StatKind::Shot {
                player_points.get(player_id).copied().unwrap_or_default()
            } else {
                counts.get(kind)
            };
            (*player_id, total)
        })
        .collect();

    let mut best: Option<(&'a str, u32)> = None;
    for (player_id, total) in candidates {
        let better = match best {
            None => true,
            Some((_, best_total)) if kind.is_negative() => total < best_total,
            Some((_, best_total)) => total > best_total,
        };
        if better {
            best = Some((player_id, total));
        }
    }
    best
}
