use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    live_game::GameSummary,
    types::{
        LineupRequest, OpponentScoreRequest, PlayerGameTotals, RecordStatRequest, ShotQuery,
        StartGameRequest,
    },
};
use crate::{
    season::{PlayerSeasonAverages, SeasonSummary},
    shared::{AppError, AppState},
    stats::{PendingStat, RecordedGroup, StatEvent},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games", post(start_game))
        .route("/games/:game_id", get(game_summary).delete(delete_game))
        .route("/games/:game_id/stats", post(record_stat))
        .route("/games/:game_id/undo", post(undo_last))
        .route("/games/:game_id/shots", get(shot_chart))
        .route("/games/:game_id/players/:player_id", get(player_totals))
        .route("/games/:game_id/opponent-score", post(adjust_opponent_score))
        .route("/games/:game_id/lineup", post(swap_players))
        .route("/games/:game_id/complete", post(complete_game))
        .route("/games/:game_id/restart", post(restart_game))
        .route("/teams/:team_id/season", get(season_summary))
        .route("/teams/:team_id/players/:player_id/season", get(player_season))
}

/// POST /games
#[instrument(name = "start_game", skip(state, request), fields(team_id = %request.team.id))]
pub async fn start_game(
    State(state): State<AppState>,
    Json(request): Json<StartGameRequest>,
) -> Result<Json<GameSummary>, AppError> {
    let summary = state
        .game_service
        .start_game(request.team, request.opponent_name, &request.starters)
        .await?;

    info!(game_id = %summary.game_id, "Game created");
    Ok(Json(summary))
}

#[instrument(name = "game_summary", skip(state))]
pub async fn game_summary(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(state.game_service.game_summary(game_id).await?))
}

/// POST /games/:game_id/stats
///
/// Records the stat together with any assist or rebound named in the body.
#[instrument(name = "record_stat", skip(state, request))]
pub async fn record_stat(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<RecordStatRequest>,
) -> Result<Json<RecordedGroup>, AppError> {
    let pending = PendingStat::try_from(request)?;
    let group = state.game_service.record_stat(game_id, pending).await?;
    Ok(Json(group))
}

/// POST /games/:game_id/undo
///
/// Responds with `null` when there is nothing left to undo.
#[instrument(name = "undo_last", skip(state))]
pub async fn undo_last(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<Option<RecordedGroup>>, AppError> {
    Ok(Json(state.game_service.undo_last(game_id).await?))
}

#[instrument(name = "shot_chart", skip(state))]
pub async fn shot_chart(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Query(query): Query<ShotQuery>,
) -> Result<Json<Vec<StatEvent>>, AppError> {
    Ok(Json(state.game_service.shots(game_id, query.filter).await?))
}

#[instrument(name = "player_totals", skip(state))]
pub async fn player_totals(
    State(state): State<AppState>,
    Path((game_id, player_id)): Path<(Uuid, String)>,
) -> Result<Json<PlayerGameTotals>, AppError> {
    Ok(Json(
        state.game_service.player_totals(game_id, &player_id).await?,
    ))
}

#[instrument(name = "adjust_opponent_score", skip(state))]
pub async fn adjust_opponent_score(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<OpponentScoreRequest>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(
        state
            .game_service
            .adjust_opponent_score(game_id, request.delta)
            .await?,
    ))
}

#[instrument(name = "swap_players", skip(state))]
pub async fn swap_players(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<LineupRequest>,
) -> Result<Json<GameSummary>, AppError> {
    let summary = state
        .game_service
        .swap_players(
            game_id,
            request.from_bench.as_deref(),
            request.to_bench.as_deref(),
        )
        .await?;
    Ok(Json(summary))
}

#[instrument(name = "complete_game", skip(state))]
pub async fn complete_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(state.game_service.complete_game(game_id).await?))
}

#[instrument(name = "restart_game", skip(state))]
pub async fn restart_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(state.game_service.restart_game(game_id).await?))
}

#[instrument(name = "delete_game", skip(state))]
pub async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameSummary>, AppError> {
    Ok(Json(state.game_service.delete_game(game_id).await?))
}

#[instrument(name = "season_summary", skip(state))]
pub async fn season_summary(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Json<SeasonSummary> {
    Json(state.game_service.season_summary(&team_id).await)
}

#[instrument(name = "player_season", skip(state))]
pub async fn player_season(
    State(state): State<AppState>,
    Path((team_id, player_id)): Path<(String, String)>,
) -> Json<PlayerSeasonAverages> {
    Json(state.game_service.player_season(&team_id, &player_id).await)
}
