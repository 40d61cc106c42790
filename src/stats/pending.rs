use chrono::Utc;

use super::{
    CourtLocation, PlayerId, RecordedGroup, ShotDetail, ShotValue, StatDetail, StatEvent,
    StatKind, StatsError,
};

/// How a staged child relates to the shot that carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildLink {
    Assist,
    Rebound,
}

/// A joined stat waiting for its parent to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedChild {
    link: ChildLink,
    stat: PendingStat,
}

impl StagedChild {
    pub fn link(&self) -> ChildLink {
        self.link
    }

    pub fn stat(&self) -> &PendingStat {
        &self.stat
    }
}

/// A stat being entered. Kind and credited player are fixed up front,
/// everything else is filled in until [`PendingStat::commit`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStat {
    kind: StatKind,
    player_id: PlayerId,
    made: Option<bool>,
    value: Option<ShotValue>,
    location: Option<CourtLocation>,
    offensive: Option<bool>,
    children: Vec<StagedChild>,
}

impl PendingStat {
    pub fn new(kind: StatKind, player_id: impl Into<PlayerId>) -> Self {
        Self {
            kind,
            player_id: player_id.into(),
            made: None,
            value: None,
            location: None,
            offensive: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> StatKind {
        self.kind
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn staged_children(&self) -> &[StagedChild] {
        &self.children
    }

    /// Every player this stat credits, the shooter first.
    pub fn credited_players(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.player_id.as_str())
            .chain(self.children.iter().map(|child| child.stat.player_id()))
    }

    pub fn assisted_by(&self) -> Option<&str> {
        self.linked_player(ChildLink::Assist)
    }

    pub fn rebounded_by(&self) -> Option<&str> {
        self.linked_player(ChildLink::Rebound)
    }

    pub fn set_made_shot(&mut self, made: bool) -> &mut Self {
        self.made = Some(made);
        self
    }

    pub fn set_points(&mut self, value: ShotValue) -> &mut Self {
        self.value = Some(value);
        self
    }

    pub fn set_shot_location(&mut self, location: CourtLocation) -> &mut Self {
        self.location = Some(location);
        self
    }

    pub fn set_offensive_rebound(&mut self, offensive: bool) -> &mut Self {
        self.offensive = Some(offensive);
        self
    }

    /// Stages an assist credited to `player`, replacing any previous one.
    /// `None` removes the staged assist.
    pub fn set_assisted_by(&mut self, player: Option<PlayerId>) -> &mut Self {
        self.stage_child(ChildLink::Assist, player.map(|id| PendingStat::new(StatKind::Assist, id)))
    }

    /// Stages an offensive rebound credited to `player`, replacing any previous one.
    /// `None` removes the staged rebound.
    pub fn set_rebounded_by(&mut self, player: Option<PlayerId>) -> &mut Self {
        let rebound = player.map(|id| {
            let mut stat = PendingStat::new(StatKind::Rebound, id);
            stat.set_offensive_rebound(true);
            stat
        });
        self.stage_child(ChildLink::Rebound, rebound)
    }

    /// Checks that every field the kind needs is present and that no field
    /// belonging to another kind was set.
    pub fn validate(&self) -> Result<(), StatsError> {
        if self.kind == StatKind::Shot {
            let made = self
                .made
                .ok_or_else(|| StatsError::validation("shot is missing make or miss"))?;
            if self.value.is_none() {
                return Err(StatsError::validation("shot is missing its point value"));
            }

            if self.assisted_by().is_some() && self.rebounded_by().is_some() {
                return Err(StatsError::validation(
                    "shot cannot carry both an assist and a rebound",
                ));
            }
            if let Some(assister) = self.assisted_by() {
                if !made {
                    return Err(StatsError::validation("missed shots cannot be assisted"));
                }
                if assister == self.player_id {
                    return Err(StatsError::validation("players cannot assist their own shot"));
                }
            }
            if self.rebounded_by().is_some() && made {
                return Err(StatsError::validation("made shots cannot be rebounded"));
            }
        } else {
            if self.made.is_some() || self.value.is_some() || self.location.is_some() {
                return Err(StatsError::validation(format!(
                    "{} cannot carry shot details",
                    self.kind
                )));
            }
            if !self.children.is_empty() {
                return Err(StatsError::validation(format!(
                    "{} cannot carry joined stats",
                    self.kind
                )));
            }
        }

        if self.kind != StatKind::Rebound && self.offensive.is_some() {
            return Err(StatsError::validation(format!(
                "{} cannot be marked offensive",
                self.kind
            )));
        }

        Ok(())
    }

    /// Materializes the stat and its staged children. The parent takes
    /// `first_sequence`, children follow in staging order.
    pub fn commit(self, first_sequence: u64) -> Result<RecordedGroup, StatsError> {
        self.validate()?;

        let recorded_at = Utc::now();
        let parent_detail = self.detail()?;
        let parent = StatEvent::new(first_sequence, self.player_id, recorded_at, parent_detail);

        let children = self
            .children
            .into_iter()
            .zip(first_sequence + 1..)
            .map(|(child, sequence)| {
                let detail = child.stat.detail()?;
                Ok(StatEvent::new(sequence, child.stat.player_id, recorded_at, detail))
            })
            .collect::<Result<Vec<_>, StatsError>>()?;

        Ok(RecordedGroup { parent, children })
    }

    fn detail(&self) -> Result<StatDetail, StatsError> {
        let detail = match self.kind {
            StatKind::Shot => StatDetail::Shot(ShotDetail {
                made: self
                    .made
                    .ok_or_else(|| StatsError::validation("shot is missing make or miss"))?,
                value: self
                    .value
                    .ok_or_else(|| StatsError::validation("shot is missing its point value"))?,
                location: self.location,
            }),
            StatKind::Rebound => StatDetail::Rebound {
                offensive: self.offensive.unwrap_or(false),
            },
            StatKind::Steal => StatDetail::Steal,
            StatKind::Turnover => StatDetail::Turnover,
            StatKind::Block => StatDetail::Block,
            StatKind::Assist => StatDetail::Assist,
            StatKind::Foul => StatDetail::Foul,
        };
        Ok(detail)
    }

    fn linked_player(&self, link: ChildLink) -> Option<&str> {
        self.children
            .iter()
            .find(|child| child.link == link)
            .map(|child| child.stat.player_id())
    }

    fn stage_child(&mut self, link: ChildLink, stat: Option<PendingStat>) -> &mut Self {
        self.children.retain(|child| child.link != link);
        if let Some(stat) = stat {
            self.children.push(StagedChild { link, stat });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn made_shot(player: &str, value: ShotValue) -> PendingStat {
        let mut stat = PendingStat::new(StatKind::Shot, player);
        stat.set_made_shot(true).set_points(value);
        stat
    }

    fn missed_shot(player: &str, value: ShotValue) -> PendingStat {
        let mut stat = PendingStat::new(StatKind::Shot, player);
        stat.set_made_shot(false).set_points(value);
        stat
    }

    #[test]
    fn test_assist_is_staged_and_removed() {
        let mut shot = made_shot("alice", ShotValue::Two);

        shot.set_assisted_by(Some("bob".to_string()));
        assert_eq!(shot.staged_children().len(), 1);
        assert_eq!(shot.staged_children()[0].link(), ChildLink::Assist);
        assert_eq!(shot.staged_children()[0].stat().kind(), StatKind::Assist);
        assert_eq!(shot.assisted_by(), Some("bob"));

        shot.set_assisted_by(None);
        assert!(shot.staged_children().is_empty());
        assert_eq!(shot.assisted_by(), None);
    }

    #[test]
    fn test_restaging_replaces_previous_child() {
        let mut shot = made_shot("alice", ShotValue::Two);
        shot.set_assisted_by(Some("bob".to_string()));
        shot.set_assisted_by(Some("carol".to_string()));

        assert_eq!(shot.staged_children().len(), 1);
        assert_eq!(shot.assisted_by(), Some("carol"));
    }

    #[test]
    fn test_rebounder_stages_offensive_rebound() {
        let mut shot = missed_shot("bob", ShotValue::Three);
        shot.set_rebounded_by(Some("carol".to_string()));

        let group = shot.commit(10).unwrap();
        assert_eq!(group.parent.sequence(), 10);
        assert_eq!(group.parent.player_id(), "bob");
        assert_eq!(group.children.len(), 1);

        let rebound = &group.children[0];
        assert_eq!(rebound.sequence(), 11);
        assert_eq!(rebound.player_id(), "carol");
        assert_eq!(rebound.detail(), &StatDetail::Rebound { offensive: true });
    }

    #[test]
    fn test_commit_made_shot_with_location() {
        let mut shot = made_shot("alice", ShotValue::Two);
        shot.set_shot_location(CourtLocation::new(0.5, 0.3).unwrap());

        let group = shot.commit(0).unwrap();
        let detail = group.parent.shot().unwrap();
        assert!(detail.made);
        assert_eq!(detail.value, ShotValue::Two);
        assert_eq!(detail.location, Some(CourtLocation::new(0.5, 0.3).unwrap()));
        assert!(group.children.is_empty());
        assert_eq!(group.points_scored(), 2);
    }

    #[test]
    fn test_rebound_defaults_to_defensive() {
        let group = PendingStat::new(StatKind::Rebound, "dave").commit(0).unwrap();
        assert_eq!(group.parent.detail(), &StatDetail::Rebound { offensive: false });
    }

    #[test]
    fn test_shot_missing_points_fails() {
        let mut shot = PendingStat::new(StatKind::Shot, "alice");
        shot.set_made_shot(true);
        assert!(matches!(shot.commit(0), Err(StatsError::Validation(_))));
    }

    #[test]
    fn test_shot_missing_make_or_miss_fails() {
        let mut shot = PendingStat::new(StatKind::Shot, "alice");
        shot.set_points(ShotValue::Three);
        assert!(matches!(shot.commit(0), Err(StatsError::Validation(_))));
    }

    #[rstest]
    #[case(StatKind::Steal)]
    #[case(StatKind::Turnover)]
    #[case(StatKind::Block)]
    #[case(StatKind::Assist)]
    #[case(StatKind::Foul)]
    fn test_simple_kinds_commit_without_details(#[case] kind: StatKind) {
        let group = PendingStat::new(kind, "erin").commit(3).unwrap();
        assert_eq!(group.parent.kind(), kind);
        assert_eq!(group.parent.sequence(), 3);
        assert!(group.children.is_empty());
    }

    #[test]
    fn test_shot_details_on_other_kind_fail() {
        let mut steal = PendingStat::new(StatKind::Steal, "erin");
        steal.set_made_shot(true);
        assert!(matches!(steal.validate(), Err(StatsError::Validation(_))));
    }

    #[test]
    fn test_offensive_flag_on_other_kind_fails() {
        let mut block = PendingStat::new(StatKind::Block, "erin");
        block.set_offensive_rebound(true);
        assert!(matches!(block.validate(), Err(StatsError::Validation(_))));
    }

    #[test]
    fn test_joined_stat_on_non_shot_fails() {
        let mut rebound = PendingStat::new(StatKind::Rebound, "erin");
        rebound.set_assisted_by(Some("frank".to_string()));
        assert!(matches!(rebound.validate(), Err(StatsError::Validation(_))));
    }

    #[test]
    fn test_both_cross_references_fail() {
        let mut shot = made_shot("alice", ShotValue::Two);
        shot.set_assisted_by(Some("bob".to_string()));
        shot.set_rebounded_by(Some("carol".to_string()));
        assert!(matches!(shot.commit(0), Err(StatsError::Validation(_))));
    }

    #[test]
    fn test_assist_on_miss_fails() {
        let mut shot = missed_shot("alice", ShotValue::Two);
        shot.set_assisted_by(Some("bob".to_string()));
        assert!(matches!(shot.validate(), Err(StatsError::Validation(_))));
    }

    #[test]
    fn test_rebound_on_make_fails() {
        let mut shot = made_shot("alice", ShotValue::Two);
        shot.set_rebounded_by(Some("bob".to_string()));
        assert!(matches!(shot.validate(), Err(StatsError::Validation(_))));
    }

    #[test]
    fn test_self_assist_fails() {
        let mut shot = made_shot("alice", ShotValue::Two);
        shot.set_assisted_by(Some("alice".to_string()));
        assert!(matches!(shot.validate(), Err(StatsError::Validation(_))));
    }

    #[test]
    fn test_shooter_may_rebound_own_miss() {
        let mut shot = missed_shot("alice", ShotValue::Two);
        shot.set_rebounded_by(Some("alice".to_string()));
        let group = shot.commit(0).unwrap();
        assert_eq!(group.children[0].player_id(), "alice");
    }

    #[test]
    fn test_credited_players_lists_shooter_first() {
        let mut shot = made_shot("alice", ShotValue::Three);
        shot.set_assisted_by(Some("bob".to_string()));
        let players: Vec<&str> = shot.credited_players().collect();
        assert_eq!(players, vec!["alice", "bob"]);
    }
}
