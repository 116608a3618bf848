use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, IndexModel,
};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{level_for_experience, PlayerRecord, INITIAL_RATING};
use super::types::SaveRequest;
use crate::leaderboard::models::{OverallEntry, WeeklyEntry};
use crate::shared::AppError;

const PLAYERS_COLLECTION: &str = "players";

/// Trait for player record storage operations
#[async_trait]
pub trait PlayerRepository {
    /// Returns the record for `player_id`, creating one with starting
    /// values when the player has never been seen before.
    async fn get_or_create(&self, player_id: &str) -> Result<PlayerRecord, AppError>;

    /// Returns the record for `player_id` without creating anything.
    async fn fetch(&self, player_id: &str) -> Result<Option<PlayerRecord>, AppError>;

    /// Overwrites the legacy save fields wholesale, creating the record
    /// when missing. Experience is stored non-negative. Returns the
    /// record after the write.
    async fn replace_fields(
        &self,
        player_id: &str,
        save: &SaveRequest,
    ) -> Result<PlayerRecord, AppError>;

    /// Writes back a full record for an existing player.
    async fn update(&self, record: &PlayerRecord) -> Result<(), AppError>;

    /// Top players by rating, games played at least once required.
    async fn overall_leaderboard(&self, limit: i64) -> Result<Vec<OverallEntry>, AppError>;

    /// Top players by wins inside `[since, until)`, judged from the
    /// bounded match history.
    async fn weekly_leaderboard(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<WeeklyEntry>, AppError>;
}

/// In-memory implementation of PlayerRepository for development and testing
///
/// This provides a realistic implementation that can be used in development
/// without requiring a real database connection. Data is stored in memory
/// and will be lost when the application restarts.
pub struct InMemoryPlayerRepository {
    players: Mutex<HashMap<String, PlayerRecord>>,
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlayerRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated players
    pub fn with_players(players: Vec<PlayerRecord>) -> Self {
        let mut player_map = HashMap::new();
        for player in players {
            player_map.insert(player.id.clone(), player);
        }

        Self {
            players: Mutex::new(player_map),
        }
    }

    /// Returns the current number of players in the repository
    pub fn player_count(&self) -> usize {
        self.players.lock().unwrap().len()
    }

    /// Checks if a player exists by ID (useful for debugging)
    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.lock().unwrap().contains_key(player_id)
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    #[instrument(skip(self))]
    async fn get_or_create(&self, player_id: &str) -> Result<PlayerRecord, AppError> {
        let mut players = self.players.lock().unwrap();
        if let Some(record) = players.get(player_id) {
            debug!(player_id = %player_id, "Player found in memory");
            return Ok(record.clone());
        }

        let record = PlayerRecord::new(player_id);
        players.insert(player_id.to_string(), record.clone());

        debug!(player_id = %player_id, "Created new player in memory");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, player_id: &str) -> Result<Option<PlayerRecord>, AppError> {
        let players = self.players.lock().unwrap();
        let record = players.get(player_id).cloned();

        match &record {
            Some(_) => debug!(player_id = %player_id, "Player found in memory"),
            None => debug!(player_id = %player_id, "Player not found in memory"),
        }

        Ok(record)
    }

    #[instrument(skip(self, save))]
    async fn replace_fields(
        &self,
        player_id: &str,
        save: &SaveRequest,
    ) -> Result<PlayerRecord, AppError> {
        let mut players = self.players.lock().unwrap();
        let created = !players.contains_key(player_id);

        let record = players
            .entry(player_id.to_string())
            .or_insert_with(|| PlayerRecord::new(player_id));
        record.prestige = save.prestige;
        record.gold = save.gold;
        record.experience = save.experience.max(0);
        record.level = level_for_experience(record.experience);
        record.items = save.items.clone();
        record.last_updated = Utc::now();

        if created {
            debug!(player_id = %player_id, "Created player from save in memory");
        } else {
            debug!(player_id = %player_id, "Saved player progress in memory");
        }
        Ok(record.clone())
    }

    #[instrument(skip(self, record))]
    async fn update(&self, record: &PlayerRecord) -> Result<(), AppError> {
        let mut players = self.players.lock().unwrap();
        if !players.contains_key(&record.id) {
            warn!(player_id = %record.id, "Player not found for update in memory");
            return Err(AppError::NotFound("Player not found".to_string()));
        }
        players.insert(record.id.clone(), record.clone());

        debug!(player_id = %record.id, "Player updated in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn overall_leaderboard(&self, limit: i64) -> Result<Vec<OverallEntry>, AppError> {
        let players = self.players.lock().unwrap();
        let mut entries: Vec<OverallEntry> = players
            .values()
            .filter(|record| record.games_played >= 1)
            .map(|record| OverallEntry {
                id: record.id.clone(),
                nickname: record.nickname.clone(),
                rating: record.rating,
                games_played: record.games_played,
                wins: record.wins,
                level: record.level,
            })
            .collect();

        entries.sort_by(|a, b| b.rating.cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));
        entries.truncate(limit as usize);

        debug!(entry_count = entries.len(), "Built overall leaderboard from memory");
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn weekly_leaderboard(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<WeeklyEntry>, AppError> {
        let players = self.players.lock().unwrap();
        let mut entries: Vec<WeeklyEntry> = players
            .values()
            .filter_map(|record| {
                let in_window: Vec<_> = record
                    .match_history
                    .iter()
                    .filter(|entry| entry.recorded_at >= since && entry.recorded_at < until)
                    .collect();
                if in_window.is_empty() {
                    return None;
                }

                let weekly_wins = in_window.iter().filter(|entry| entry.win).count() as i64;
                Some(WeeklyEntry {
                    id: record.id.clone(),
                    nickname: record.nickname.clone(),
                    rating: record.rating,
                    level: record.level,
                    weekly_games: in_window.len() as i64,
                    weekly_wins,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.weekly_wins
                .cmp(&a.weekly_wins)
                .then_with(|| b.weekly_games.cmp(&a.weekly_games))
                .then_with(|| a.id.cmp(&b.id))
        });
        entries.truncate(limit as usize);

        debug!(entry_count = entries.len(), "Built weekly leaderboard from memory");
        Ok(entries)
    }
}

/// MongoDB implementation of the player repository
pub struct MongoPlayerRepository {
    players: Collection<PlayerRecord>,
}

impl MongoPlayerRepository {
    /// Connects to MongoDB, verifies the server is reachable, and
    /// ensures the unique index on the player id.
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, AppError> {
        let client = Client::with_uri_str(uri).await.map_err(|e| {
            warn!(error = %e, "Failed to build MongoDB client");
            AppError::DatabaseError(e.to_string())
        })?;

        let database = client.database(database_name);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| {
                warn!(error = %e, "MongoDB ping failed");
                AppError::DatabaseError(e.to_string())
            })?;

        let players = database.collection::<PlayerRecord>(PLAYERS_COLLECTION);
        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        players.create_index(index).await.map_err(|e| {
            warn!(error = %e, "Failed to create player id index");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(Self { players })
    }
}

#[async_trait]
impl PlayerRepository for MongoPlayerRepository {
    #[instrument(skip(self))]
    async fn get_or_create(&self, player_id: &str) -> Result<PlayerRecord, AppError> {
        debug!(player_id = %player_id, "Fetching or creating player in database");

        // Starting values come from the same constructor the in-memory
        // store uses. The id is supplied by the filter, so it has to be
        // stripped from the $setOnInsert document.
        let defaults = PlayerRecord::new(player_id);
        let mut on_insert = bson::to_document(&defaults).map_err(|e| {
            warn!(error = %e, "Failed to encode player defaults");
            AppError::DatabaseError(e.to_string())
        })?;
        on_insert.remove("id");

        let record = self
            .players
            .find_one_and_update(doc! { "id": player_id }, doc! { "$setOnInsert": on_insert })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                warn!(error = %e, player_id = %player_id, "Failed to fetch or create player");
                AppError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                warn!(player_id = %player_id, "Upsert returned no document");
                AppError::DatabaseError("Upsert returned no document".to_string())
            })?;

        Ok(record)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, player_id: &str) -> Result<Option<PlayerRecord>, AppError> {
        debug!(player_id = %player_id, "Fetching player from database");

        let record = self
            .players
            .find_one(doc! { "id": player_id })
            .await
            .map_err(|e| {
                warn!(error = %e, player_id = %player_id, "Failed to fetch player from database");
                AppError::DatabaseError(e.to_string())
            })?;

        match &record {
            Some(_) => debug!(player_id = %player_id, "Player found in database"),
            None => debug!(player_id = %player_id, "Player not found in database"),
        }

        Ok(record)
    }

    #[instrument(skip(self, save))]
    async fn replace_fields(
        &self,
        player_id: &str,
        save: &SaveRequest,
    ) -> Result<PlayerRecord, AppError> {
        debug!(player_id = %player_id, "Saving player progress in database");

        let now = Utc::now();
        let experience = save.experience.max(0);
        let update = doc! {
            "$set": {
                "prestige": save.prestige,
                "gold": save.gold,
                "experience": experience,
                "level": level_for_experience(experience),
                "items": save.items.clone(),
                "lastUpdated": bson::DateTime::from_chrono(now),
            },
            // Progression fields untouched by a save still need starting
            // values when the upsert inserts a brand-new record.
            "$setOnInsert": {
                "gamesPlayed": 0_i64,
                "wins": 0_i64,
                "mvpCount": 0_i64,
                "rating": INITIAL_RATING,
                "matchHistory": [],
            },
        };

        let record = self
            .players
            .find_one_and_update(doc! { "id": player_id }, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                warn!(error = %e, player_id = %player_id, "Failed to save player progress");
                AppError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                warn!(player_id = %player_id, "Upsert returned no document");
                AppError::DatabaseError("Upsert returned no document".to_string())
            })?;

        Ok(record)
    }

    #[instrument(skip(self, record))]
    async fn update(&self, record: &PlayerRecord) -> Result<(), AppError> {
        debug!(player_id = %record.id, "Updating player in database");

        let result = self
            .players
            .replace_one(doc! { "id": &record.id }, record)
            .await
            .map_err(|e| {
                warn!(error = %e, player_id = %record.id, "Failed to update player in database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.matched_count == 0 {
            warn!(player_id = %record.id, "Player not found for update");
            return Err(AppError::NotFound("Player not found".to_string()));
        }

        debug!(player_id = %record.id, "Player updated successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn overall_leaderboard(&self, limit: i64) -> Result<Vec<OverallEntry>, AppError> {
        debug!(limit, "Loading overall leaderboard from database");

        let pipeline = vec![
            doc! { "$match": { "gamesPlayed": { "$gte": 1 } } },
            doc! { "$sort": { "rating": -1, "id": 1 } },
            doc! { "$limit": limit },
            doc! { "$project": {
                "_id": 0,
                "id": 1,
                "nickname": 1,
                "rating": 1,
                "gamesPlayed": 1,
                "wins": 1,
                "level": 1,
            } },
        ];

        let mut cursor = self.players.aggregate(pipeline).await.map_err(|e| {
            warn!(error = %e, "Failed to run overall leaderboard aggregation");
            AppError::DatabaseError(e.to_string())
        })?;

        let mut entries = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(|e| {
            warn!(error = %e, "Failed to read overall leaderboard results");
            AppError::DatabaseError(e.to_string())
        })? {
            let entry: OverallEntry = bson::from_document(document).map_err(|e| {
                warn!(error = %e, "Malformed overall leaderboard row");
                AppError::DatabaseError(e.to_string())
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn weekly_leaderboard(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<WeeklyEntry>, AppError> {
        debug!(limit, "Loading weekly leaderboard from database");

        let since_bson = bson::DateTime::from_chrono(since);
        let until_bson = bson::DateTime::from_chrono(until);

        let pipeline = vec![
            // Cheap prefilter; the $filter below enforces the exact window.
            doc! { "$match": { "matchHistory.recordedAt": { "$gte": since_bson } } },
            doc! { "$project": {
                "_id": 0,
                "id": 1,
                "nickname": 1,
                "rating": 1,
                "level": 1,
                "weeklyEntries": {
                    "$filter": {
                        "input": "$matchHistory",
                        "as": "entry",
                        "cond": { "$and": [
                            { "$gte": ["$$entry.recordedAt", since_bson] },
                            { "$lt": ["$$entry.recordedAt", until_bson] },
                        ] },
                    }
                },
            } },
            doc! { "$project": {
                "id": 1,
                "nickname": 1,
                "rating": 1,
                "level": 1,
                "weeklyGames": { "$size": "$weeklyEntries" },
                "weeklyWins": { "$size": {
                    "$filter": {
                        "input": "$weeklyEntries",
                        "as": "entry",
                        "cond": "$$entry.win",
                    }
                } },
            } },
            doc! { "$match": { "weeklyGames": { "$gt": 0 } } },
            doc! { "$sort": { "weeklyWins": -1, "weeklyGames": -1, "id": 1 } },
            doc! { "$limit": limit },
        ];

        let mut cursor = self.players.aggregate(pipeline).await.map_err(|e| {
            warn!(error = %e, "Failed to run weekly leaderboard aggregation");
            AppError::DatabaseError(e.to_string())
        })?;

        let mut entries = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(|e| {
            warn!(error = %e, "Failed to read weekly leaderboard results");
            AppError::DatabaseError(e.to_string())
        })? {
            let entry: WeeklyEntry = bson::from_document(document).map_err(|e| {
                warn!(error = %e, "Malformed weekly leaderboard row");
                AppError::DatabaseError(e.to_string())
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }
}
