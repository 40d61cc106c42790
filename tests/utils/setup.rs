#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;

use boxscore::{
    event::DEFAULT_GAME_CAPACITY,
    game::{GameSummary, Player, Team},
    EventBus, GameRepository, GameService, InMemoryStatSink, PersistenceSubscriber, StatSink,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: GameService,
    pub sink: Arc<InMemoryStatSink>,
    pub team: Team,
}

impl TestSetup {
    /// Start a game against "Hawks" with the given starters
    pub async fn start_game(&self, starters: &[&str]) -> GameSummary {
        let starters: Vec<String> = starters.iter().map(|s| s.to_string()).collect();
        self.service
            .start_game(self.team.clone(), Some("Hawks".to_string()), &starters)
            .await
            .expect("game should start")
    }
}

pub struct TestSetupBuilder {
    players: Vec<&'static str>,
    sink: Option<Arc<dyn StatSink>>,
    persistence: bool,
    event_capacity: usize,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec!["alice", "bob", "carol", "dave", "erin", "frank"],
            sink: None,
            persistence: true,
            event_capacity: DEFAULT_GAME_CAPACITY,
        }
    }

    pub fn with_players(mut self, players: Vec<&'static str>) -> Self {
        self.players = players;
        self
    }

    /// Persist through `sink` instead of the in-memory one
    pub fn with_sink(mut self, sink: Arc<dyn StatSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Queue size of each subscriber on the event bus
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn without_persistence(mut self) -> Self {
        self.persistence = false;
        self
    }

    pub fn build(self) -> TestSetup {
        let memory_sink = Arc::new(InMemoryStatSink::new());
        let sink: Arc<dyn StatSink> = self.sink.unwrap_or_else(|| memory_sink.clone());

        let mut builder = GameService::builder(GameRepository::new(), EventBus::new(self.event_capacity));
        if self.persistence {
            builder = builder.with_handler(Arc::new(PersistenceSubscriber::new(sink)));
        }

        TestSetup {
            service: builder.build(),
            sink: memory_sink,
            team: roster("owls", &self.players),
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn roster(team_id: &str, players: &[&str]) -> Team {
    Team {
        id: team_id.to_string(),
        name: "Owls".to_string(),
        players: players
            .iter()
            .enumerate()
            .map(|(number, id)| Player {
                id: id.to_string(),
                first_name: id.to_string(),
                last_name: "Owl".to_string(),
                number: number as u32,
            })
            .collect(),
    }
}
