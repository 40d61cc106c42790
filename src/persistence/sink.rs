use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::game::GameSummary;
use crate::stats::{RecordedGroup, StatEvent};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage rejected record: {0}")]
    Rejected(String),
}

/// Durable storage for recorded stats.
///
/// Writes are best effort: the in-memory ledger stays authoritative and is
/// never rolled back because a save or delete failed here.
#[async_trait]
pub trait StatSink: Send + Sync {
    async fn save_group(&self, game_id: Uuid, group: &RecordedGroup) -> Result<(), SinkError>;

    /// Deletes every event of the group. Deleting records that were never
    /// saved is not an error.
    async fn delete_group(&self, game_id: Uuid, group: &RecordedGroup) -> Result<(), SinkError>;

    async fn save_game(&self, summary: &GameSummary) -> Result<(), SinkError>;

    /// Drops the game's summary and every stored event of it.
    async fn delete_game(&self, game_id: Uuid) -> Result<(), SinkError>;
}

#[derive(Debug, Default)]
pub struct InMemoryStatSink {
    events: Arc<RwLock<HashMap<Uuid, HashMap<Uuid, StatEvent>>>>,
    games: Arc<RwLock<HashMap<Uuid, GameSummary>>>,
}

impl InMemoryStatSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored events of a game ordered by sequence.
    pub async fn events_for_game(&self, game_id: Uuid) -> Vec<StatEvent> {
        let events = self.events.read().await;
        let mut stored: Vec<StatEvent> = events
            .get(&game_id)
            .map(|game_events| game_events.values().cloned().collect())
            .unwrap_or_default();
        stored.sort_by_key(StatEvent::sequence);
        stored
    }

    pub async fn game(&self, game_id: Uuid) -> Option<GameSummary> {
        let games = self.games.read().await;
        games.get(&game_id).cloned()
    }
}

#[async_trait]
impl StatSink for InMemoryStatSink {
    async fn save_group(&self, game_id: Uuid, group: &RecordedGroup) -> Result<(), SinkError> {
        let mut events = self.events.write().await;
        let game_events = events.entry(game_id).or_default();
        for event in group.events() {
            game_events.insert(event.id(), event.clone());
        }
        Ok(())
    }

    async fn delete_group(&self, game_id: Uuid, group: &RecordedGroup) -> Result<(), SinkError> {
        let mut events = self.events.write().await;
        if let Some(game_events) = events.get_mut(&game_id) {
            for event in group.events() {
                game_events.remove(&event.id());
            }
        }
        Ok(())
    }

    async fn save_game(&self, summary: &GameSummary) -> Result<(), SinkError> {
        let mut games = self.games.write().await;
        games.insert(summary.game_id, summary.clone());
        Ok(())
    }

    async fn delete_game(&self, game_id: Uuid) -> Result<(), SinkError> {
        self.events.write().await.remove(&game_id);
        self.games.write().await.remove(&game_id);
        Ok(())
    }
}
