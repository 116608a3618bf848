use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{MatchReportRequest, PlayerResponse, PlayerUpdateResponse, SaveRequest};
use crate::shared::{AppError, AppState};

/// HTTP handler for loading a player record
///
/// GET /player/:player_id
/// Creates the record with starting values on first request
#[instrument(name = "get_player", skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerResponse>, AppError> {
    info!(player_id = %player_id, "Loading player record");

    let record = state.player_service.get_or_create(&player_id).await?;

    info!(
        player_id = %record.id,
        level = record.level,
        rating = record.rating,
        "Player record loaded"
    );

    Ok(Json(record.into()))
}

/// HTTP handler for the legacy save endpoint
///
/// POST /player/:player_id/save
/// Overwrites prestige, gold, experience and items wholesale
#[instrument(name = "save_player", skip(state, save))]
pub async fn save_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(save): Json<SaveRequest>,
) -> Result<Json<PlayerUpdateResponse>, AppError> {
    info!(player_id = %player_id, "Saving player progress");

    let record = state.player_service.save_progress(&player_id, save).await?;

    info!(
        player_id = %record.id,
        level = record.level,
        experience = record.experience,
        "Player progress saved"
    );

    Ok(Json(PlayerUpdateResponse {
        success: true,
        player: record.into(),
    }))
}

/// HTTP handler for reporting a finished match
///
/// POST /player/:player_id/report-match
/// Applies the match to an existing player, 404 for unknown players
#[instrument(name = "report_match", skip(state, report))]
pub async fn report_match(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(report): Json<MatchReportRequest>,
) -> Result<Json<PlayerUpdateResponse>, AppError> {
    info!(player_id = %player_id, win = report.win, "Reporting match result");

    let record = state.player_service.report_match(&player_id, report).await?;

    info!(
        player_id = %record.id,
        rating = record.rating,
        games_played = record.games_played,
        "Match result recorded"
    );

    Ok(Json(PlayerUpdateResponse {
        success: true,
        player: record.into(),
    }))
}
