use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use uuid::Uuid;

use super::live_game::LiveGame;

/// A live game behind its own lock. Every read and write of the game goes
/// through this mutex so recording and undo never interleave.
pub type SharedGame = Arc<AsyncMutex<LiveGame>>;

struct GameEntry {
    team_id: String,
    game: SharedGame,
}

pub struct GameRepository {
    /// A mapping from game ID to game
    games: Arc<RwLock<HashMap<Uuid, GameEntry>>>,
}

impl Default for GameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRepository {
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, game: LiveGame) -> SharedGame {
        let id = game.id();
        let team_id = game.team().id.clone();
        let shared = Arc::new(AsyncMutex::new(game));

        let mut games = self.games.write().await;
        games.insert(
            id,
            GameEntry {
                team_id,
                game: shared.clone(),
            },
        );
        shared
    }

    pub async fn get(&self, game_id: Uuid) -> Option<SharedGame> {
        let games = self.games.read().await;
        games.get(&game_id).map(|entry| entry.game.clone())
    }

    pub async fn remove(&self, game_id: Uuid) -> Option<SharedGame> {
        let mut games = self.games.write().await;
        games.remove(&game_id).map(|entry| entry.game)
    }

    pub async fn games_for_team(&self, team_id: &str) -> Vec<SharedGame> {
        let games = self.games.read().await;
        games
            .values()
            .filter(|entry| entry.team_id == team_id)
            .map(|entry| entry.game.clone())
            .collect()
    }
}
