use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::leaderboard::service::LeaderboardService;
use crate::player::repository::PlayerRepository;
use crate::player::service::PlayerService;

/// Shared application state containing all dependencies
///
/// Services live here rather than being built per-request because
/// `PlayerService` owns the per-player lock map that serializes
/// concurrent writes to the same record.
#[derive(Clone)]
pub struct AppState {
    pub player_service: Arc<PlayerService>,
    pub leaderboard_service: Arc<LeaderboardService>,
    pub api_key: String,
}

impl AppState {
    pub fn new(repository: Arc<dyn PlayerRepository + Send + Sync>, api_key: String) -> Self {
        Self {
            player_service: Arc::new(PlayerService::new(Arc::clone(&repository))),
            leaderboard_service: Arc::new(LeaderboardService::new(repository)),
            api_key,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
