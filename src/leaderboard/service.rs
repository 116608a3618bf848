use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::instrument;

use super::models::{OverallEntry, WeeklyEntry};
use super::{LEADERBOARD_SIZE, WEEKLY_WINDOW_DAYS};
use crate::player::repository::PlayerRepository;
use crate::shared::AppError;

/// Read-side ranking queries over the player store.
pub struct LeaderboardService {
    repository: Arc<dyn PlayerRepository + Send + Sync>,
}

impl LeaderboardService {
    pub fn new(repository: Arc<dyn PlayerRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Top players by rating among those with at least one game.
    #[instrument(skip(self))]
    pub async fn overall(&self) -> Result<Vec<OverallEntry>, AppError> {
        self.repository.overall_leaderboard(LEADERBOARD_SIZE).await
    }

    /// Top players by wins over the trailing seven days.
    #[instrument(skip(self))]
    pub async fn weekly(&self) -> Result<Vec<WeeklyEntry>, AppError> {
        let until = Utc::now();
        let since = until - Duration::days(WEEKLY_WINDOW_DAYS);
        self.repository
            .weekly_leaderboard(since, until, LEADERBOARD_SIZE)
            .await
    }
}
