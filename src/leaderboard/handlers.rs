use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::models::{OverallEntry, WeeklyEntry};
use crate::shared::{AppError, AppState};

/// HTTP handler for the overall leaderboard
///
/// GET /leaderboard/overall
/// Returns the top ten players by rating
#[instrument(name = "overall_leaderboard", skip(state))]
pub async fn overall_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<OverallEntry>>, AppError> {
    info!("Loading overall leaderboard");

    let entries = state.leaderboard_service.overall().await?;

    info!(entry_count = entries.len(), "Overall leaderboard loaded");

    Ok(Json(entries))
}

/// HTTP handler for the weekly leaderboard
///
/// GET /leaderboard/weekly
/// Returns the top ten players by wins over the last seven days
#[instrument(name = "weekly_leaderboard", skip(state))]
pub async fn weekly_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<WeeklyEntry>>, AppError> {
    info!("Loading weekly leaderboard");

    let entries = state.leaderboard_service.weekly().await?;

    info!(entry_count = entries.len(), "Weekly leaderboard loaded");

    Ok(Json(entries))
}
