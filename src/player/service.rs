use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{info, instrument};

use super::models::PlayerRecord;
use super::processor::apply_match_report;
use super::repository::PlayerRepository;
use super::types::{MatchReportRequest, SaveRequest};
use crate::shared::AppError;

/// Orchestrates reads and writes of player records.
///
/// Match reports and saves for the same player are serialized through
/// a per-player async mutex, so concurrent requests cannot overwrite
/// each other's read-modify-write cycle.
pub struct PlayerService {
    repository: Arc<dyn PlayerRepository + Send + Sync>,
    player_locks: Arc<RwLock<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepository + Send + Sync>) -> Self {
        Self {
            repository,
            player_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Loads a player, creating the record on first sight.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, player_id: &str) -> Result<PlayerRecord, AppError> {
        self.repository.get_or_create(player_id).await
    }

    /// Overwrites the legacy save fields and recomputes the level.
    #[instrument(skip(self, save))]
    pub async fn save_progress(
        &self,
        player_id: &str,
        save: SaveRequest,
    ) -> Result<PlayerRecord, AppError> {
        let player_lock = self.player_lock(player_id).await;
        let _guard = player_lock.lock().await;

        let record = self.repository.replace_fields(player_id, &save).await?;

        info!(
            player_id = %player_id,
            experience = record.experience,
            level = record.level,
            "Player progress saved"
        );
        Ok(record)
    }

    /// Applies a finished match to an existing player.
    ///
    /// Unknown players are rejected rather than created.
    #[instrument(skip(self, report))]
    pub async fn report_match(
        &self,
        player_id: &str,
        report: MatchReportRequest,
    ) -> Result<PlayerRecord, AppError> {
        let player_lock = self.player_lock(player_id).await;
        let _guard = player_lock.lock().await;

        let record = self
            .repository
            .fetch(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;

        let updated = apply_match_report(record, &report, Utc::now());
        self.repository.update(&updated).await?;

        info!(
            player_id = %player_id,
            win = report.win,
            rating = updated.rating,
            games_played = updated.games_played,
            "Match report applied"
        );
        Ok(updated)
    }

    async fn player_lock(&self, player_id: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.player_locks.read().await;
            if let Some(lock) = guard.get(player_id) {
                return lock.clone();
            }
        }

        let mut guard = self.player_locks.write().await;
        guard
            .entry(player_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::repository::InMemoryPlayerRepository;
    use futures::future::join_all;

    fn setup() -> (Arc<InMemoryPlayerRepository>, PlayerService) {
        let repository = Arc::new(InMemoryPlayerRepository::new());
        let service = PlayerService::new(repository.clone());
        (repository, service)
    }

    fn report(win: bool, exp_gain: i64) -> MatchReportRequest {
        MatchReportRequest {
            win,
            hero: "axe".to_string(),
            prestige: 0,
            kills: 0,
            damage: 0,
            exp_gain,
            is_mvp: false,
            nickname: None,
        }
    }

    #[tokio::test]
    async fn test_get_or_create_returns_new_record() {
        let (repository, service) = setup();

        let record = service.get_or_create("76561").await.unwrap();

        assert_eq!(record.id, "76561");
        assert_eq!(record.rating, 1500);
        assert_eq!(repository.player_count(), 1);
    }

    #[tokio::test]
    async fn test_report_match_applies_and_persists() {
        let (repository, service) = setup();
        service.get_or_create("76561").await.unwrap();

        let updated = service.report_match("76561", report(true, 500)).await.unwrap();

        assert_eq!(updated.games_played, 1);
        assert_eq!(updated.wins, 1);
        assert_eq!(updated.rating, 1525);
        assert_eq!(updated.experience, 500);

        let stored = repository.fetch("76561").await.unwrap().unwrap();
        assert_eq!(stored.games_played, 1);
        assert_eq!(stored.rating, 1525);
    }

    #[tokio::test]
    async fn test_report_match_for_unknown_player_is_not_found() {
        let (repository, service) = setup();

        let result = service.report_match("ghost", report(true, 500)).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
        // a failed report must not create the player as a side effect
        assert_eq!(repository.player_count(), 0);
    }

    #[tokio::test]
    async fn test_save_progress_creates_and_overwrites() {
        let (_, service) = setup();

        let save = SaveRequest {
            prestige: 5,
            gold: 250,
            experience: 1200,
            items: vec!["blink".to_string()],
        };
        let record = service.save_progress("76561", save).await.unwrap();

        assert_eq!(record.experience, 1200);
        assert_eq!(record.level, 2);
        assert_eq!(record.gold, 250);

        let overwrite = SaveRequest {
            prestige: 0,
            gold: 0,
            experience: 0,
            items: Vec::new(),
        };
        let record = service.save_progress("76561", overwrite).await.unwrap();

        assert_eq!(record.experience, 0);
        assert_eq!(record.level, 1);
        assert!(record.items.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_match_reports_are_not_lost() {
        let (repository, service) = setup();
        service.get_or_create("76561").await.unwrap();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service.report_match("76561", report(i % 2 == 0, 100)).await
                })
            })
            .collect();

        for result in join_all(handles).await {
            result.unwrap().unwrap();
        }

        let stored = repository.fetch("76561").await.unwrap().unwrap();
        assert_eq!(stored.games_played, 20);
        assert_eq!(stored.wins, 10);
        assert_eq!(stored.experience, 2000);
        assert_eq!(stored.level, 3);
        // ten wins and ten losses cancel out
        assert_eq!(stored.rating, 1500);
        assert_eq!(stored.match_history.len(), 10);
    }
}
