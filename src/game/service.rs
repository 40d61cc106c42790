use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    ledger::ShotFilter,
    live_game::{GameSummary, LiveGame},
    repository::{GameRepository, SharedGame},
    roster::Team,
    types::PlayerGameTotals,
};
use crate::{
    event::{EventBus, GameEvent, GameEventHandler, GameSubscription},
    season::{PlayerSeasonAverages, SeasonSummary},
    shared::AppError,
    stats::{PendingStat, PlayerId, RecordedGroup, StatEvent},
};

/// Entry point for everything that happens to live games.
///
/// Each call locks only the game it touches, and sends its event before
/// releasing that lock, so subscribers see events in ledger order.
pub struct GameService {
    repository: GameRepository,
    event_bus: EventBus,
    handlers: Vec<Arc<dyn GameEventHandler>>,
    subscriptions: Arc<RwLock<HashMap<Uuid, Vec<JoinHandle<()>>>>>,
}

impl GameService {
    pub fn builder(repository: GameRepository, event_bus: EventBus) -> GameServiceBuilder {
        GameServiceBuilder::new(repository, event_bus)
    }

    #[instrument(skip(self, team), fields(team_id = %team.id))]
    pub async fn start_game(
        &self,
        team: Team,
        opponent_name: Option<String>,
        starters: &[PlayerId],
    ) -> Result<GameSummary, AppError> {
        let game = LiveGame::new(team, opponent_name, starters)?;
        let game_id = game.id();
        let summary = game.summary();

        // Subscribe every handler before the first event goes out
        self.open_subscriptions(game_id).await;
        self.repository.insert(game).await;

        info!(game_id = %game_id, opponent = %summary.opponent_name, "Game started");
        self.event_bus
            .emit(GameEvent::GameStarted {
                game_id,
                team_id: summary.team_id.clone(),
                opponent_name: summary.opponent_name.clone(),
            })
            .await;

        Ok(summary)
    }

    #[instrument(skip(self))]
    pub async fn record_stat(
        &self,
        game_id: Uuid,
        pending: PendingStat,
    ) -> Result<RecordedGroup, AppError> {
        let game = self.game(game_id).await?;
        let mut game = game.lock().await;
        let group = game.record(pending)?;

        self.event_bus
            .emit(GameEvent::StatRecorded {
                game_id,
                group: group.clone(),
                team_score: game.team_score(),
            })
            .await;
        Ok(group)
    }

    /// Undoes the most recent stat group. `None` when nothing is left to undo.
    #[instrument(skip(self))]
    pub async fn undo_last(&self, game_id: Uuid) -> Result<Option<RecordedGroup>, AppError> {
        let game = self.game(game_id).await?;
        let mut game = game.lock().await;
        let undone = game.undo_last()?;

        if let Some(group) = &undone {
            self.event_bus
                .emit(GameEvent::StatUndone {
                    game_id,
                    group: group.clone(),
                    team_score: game.team_score(),
                })
                .await;
        }
        Ok(undone)
    }

    #[instrument(skip(self))]
    pub async fn adjust_opponent_score(
        &self,
        game_id: Uuid,
        delta: i32,
    ) -> Result<GameSummary, AppError> {
        let game = self.game(game_id).await?;
        let mut game = game.lock().await;
        game.adjust_opponent_score(delta)?;
        let summary = game.summary();

        self.event_bus
            .emit(GameEvent::OpponentScoreChanged {
                game_id,
                opponent_score: summary.opponent_score,
            })
            .await;
        Ok(summary)
    }

    #[instrument(skip(self))]
    pub async fn swap_players(
        &self,
        game_id: Uuid,
        from_bench: Option<&str>,
        to_bench: Option<&str>,
    ) -> Result<GameSummary, AppError> {
        let game = self.game(game_id).await?;
        let mut game = game.lock().await;
        game.swap_players(from_bench, to_bench)?;
        let summary = game.summary();

        self.event_bus
            .emit(GameEvent::LineupChanged {
                game_id,
                on_court: summary.on_court.clone(),
                bench: summary.bench.clone(),
            })
            .await;
        Ok(summary)
    }

    /// Ends the game, then waits for subscribers to finish with its events.
    #[instrument(skip(self))]
    pub async fn complete_game(&self, game_id: Uuid) -> Result<GameSummary, AppError> {
        let game = self.game(game_id).await?;
        let summary = {
            let mut game = game.lock().await;
            game.complete()?;
            let summary = game.summary();
            self.event_bus
                .emit(GameEvent::GameCompleted {
                    game_id,
                    summary: summary.clone(),
                })
                .await;
            self.event_bus.close_game(game_id).await;
            summary
        };

        self.drain_subscriptions(game_id).await;
        Ok(summary)
    }

    #[instrument(skip(self))]
    pub async fn restart_game(&self, game_id: Uuid) -> Result<GameSummary, AppError> {
        let game = self.game(game_id).await?;
        let mut game = game.lock().await;
        let dropped = game.restart()?;

        self.event_bus
            .emit(GameEvent::GameRestarted { game_id, dropped })
            .await;
        Ok(game.summary())
    }

    /// Discards a game in any state, releasing its subscriptions and telling
    /// subscribers to forget whatever they stored for it.
    #[instrument(skip(self))]
    pub async fn delete_game(&self, game_id: Uuid) -> Result<GameSummary, AppError> {
        let game = self
            .repository
            .remove(game_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Game not found: {}", game_id)))?;

        let summary = {
            let game = game.lock().await;
            // A completed game has already closed its subscriptions
            if !self.event_bus.is_open(game_id).await {
                self.open_subscriptions(game_id).await;
            }
            self.event_bus.emit(GameEvent::GameDeleted { game_id }).await;
            self.event_bus.close_game(game_id).await;
            game.summary()
        };

        self.drain_subscriptions(game_id).await;
        info!(game_id = %game_id, "Game deleted");
        Ok(summary)
    }

    pub async fn game_summary(&self, game_id: Uuid) -> Result<GameSummary, AppError> {
        let game = self.game(game_id).await?;
        let game = game.lock().await;
        Ok(game.summary())
    }

    pub async fn shots(&self, game_id: Uuid, filter: ShotFilter) -> Result<Vec<StatEvent>, AppError> {
        let game = self.game(game_id).await?;
        let game = game.lock().await;
        Ok(game.ledger().shots(filter).into_iter().cloned().collect())
    }

    pub async fn player_totals(
        &self,
        game_id: Uuid,
        player_id: &str,
    ) -> Result<PlayerGameTotals, AppError> {
        let game = self.game(game_id).await?;
        let game = game.lock().await;
        if !game.team().has_player(player_id) {
            return Err(AppError::NotFound(format!(
                "Player {} is not on this team",
                player_id
            )));
        }

        let ledger = game.ledger();
        Ok(PlayerGameTotals {
            player_id: player_id.to_string(),
            points: ledger.points_for_player(player_id),
            counts: ledger.totals_for_player(player_id),
            shooting: ledger.shooting_splits(Some(player_id)),
        })
    }

    #[instrument(skip(self))]
    pub async fn season_summary(&self, team_id: &str) -> SeasonSummary {
        let games = self.team_games(team_id).await;
        SeasonSummary::from_games(team_id, &games)
    }

    #[instrument(skip(self))]
    pub async fn player_season(&self, team_id: &str, player_id: &str) -> PlayerSeasonAverages {
        let games = self.team_games(team_id).await;
        PlayerSeasonAverages::from_games(player_id, &games)
    }

    async fn game(&self, game_id: Uuid) -> Result<SharedGame, AppError> {
        self.repository
            .get(game_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Game not found: {}", game_id)))
    }

    async fn open_subscriptions(&self, game_id: Uuid) {
        let mut handles = Vec::with_capacity(self.handlers.len());
        for handler in &self.handlers {
            let handle = GameSubscription::new(game_id, handler.clone(), self.event_bus.clone())
                .start()
                .await;
            handles.push(handle);
        }
        self.subscriptions.write().await.insert(game_id, handles);
    }

    /// Waits for the game's subscriptions to handle what is already queued.
    /// The game's bus channel must be closed first.
    async fn drain_subscriptions(&self, game_id: Uuid) {
        let handles = self.subscriptions.write().await.remove(&game_id);
        for handle in handles.into_iter().flatten() {
            if let Err(e) = handle.await {
                warn!(game_id = %game_id, error = %e, "Game subscription task failed");
            }
        }
    }

    /// Snapshots of a team's games, taken one lock at a time.
    async fn team_games(&self, team_id: &str) -> Vec<LiveGame> {
        let mut games = Vec::new();
        for shared in self.repository.games_for_team(team_id).await {
            games.push(shared.lock().await.clone());
        }
        games
    }
}

pub struct GameServiceBuilder {
    repository: GameRepository,
    event_bus: EventBus,
    handlers: Vec<Arc<dyn GameEventHandler>>,
}

impl GameServiceBuilder {
    pub fn new(repository: GameRepository, event_bus: EventBus) -> Self {
        Self {
            repository,
            event_bus,
            handlers: Vec::new(),
        }
    }

    /// Adds a handler that receives the events of every game started afterwards.
    pub fn with_handler(mut self, handler: Arc<dyn GameEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn build(self) -> GameService {
        GameService {
            repository: self.repository,
            event_bus: self.event_bus,
            handlers: self.handlers,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}
