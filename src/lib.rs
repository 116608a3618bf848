// Library crate for the Dota Infinity progression backend
// This file exposes the public API for integration tests

pub mod auth;
pub mod config;
pub mod leaderboard;
pub mod player;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use leaderboard::{OverallEntry, WeeklyEntry};
pub use player::{repository::PlayerRepository, PlayerRecord};
pub use shared::{AppError, AppState};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the application router: a public liveness route plus the
/// API-key-protected player and leaderboard routes.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/player/:player_id", get(player::get_player))
        .route("/player/:player_id/save", post(player::save_player))
        .route(
            "/player/:player_id/report-match",
            post(player::report_match),
        )
        .route(
            "/leaderboard/overall",
            get(leaderboard::overall_leaderboard),
        )
        .route("/leaderboard/weekly", get(leaderboard::weekly_leaderboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/", get(|| async { "Dota Infinity Backend is running!" }))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
