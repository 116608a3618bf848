use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::history::MatchEntry;
use super::models::PlayerRecord;

/// Request payload for the legacy save endpoint.
///
/// Clients on old builds omit fields freely, so everything defaults
/// to zero or empty.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub prestige: i64,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub experience: i64,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Request payload for reporting a finished match.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReportRequest {
    pub win: bool,
    pub hero: String,
    #[serde(default)]
    pub prestige: i64,
    #[serde(default)]
    pub kills: i64,
    #[serde(default)]
    pub damage: i64,
    #[serde(default)]
    pub exp_gain: i64,
    #[serde(default)]
    pub is_mvp: bool,
    pub nickname: Option<String>,
}

/// A match history entry as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntryResponse {
    pub hero: String,
    pub win: bool,
    pub prestige: i64,
    pub kills: i64,
    pub damage: i64,
    pub recorded_at: DateTime<Utc>,
}

/// Full player record as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub id: String,
    pub nickname: Option<String>,
    pub level: i64,
    pub experience: i64,
    pub games_played: i64,
    pub wins: i64,
    pub mvp_count: i64,
    pub rating: i64,
    pub prestige: i64,
    pub gold: i64,
    pub items: Vec<String>,
    pub match_history: Vec<MatchEntryResponse>,
    pub last_updated: DateTime<Utc>,
}

/// Response for endpoints that mutate a player record.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerUpdateResponse {
    pub success: bool,
    pub player: PlayerResponse,
}

impl From<&MatchEntry> for MatchEntryResponse {
    fn from(entry: &MatchEntry) -> Self {
        Self {
            hero: entry.hero.clone(),
            win: entry.win,
            prestige: entry.prestige,
            kills: entry.kills,
            damage: entry.damage,
            recorded_at: entry.recorded_at,
        }
    }
}

impl From<PlayerRecord> for PlayerResponse {
    fn from(record: PlayerRecord) -> Self {
        Self {
            match_history: record
                .match_history
                .iter()
                .map(MatchEntryResponse::from)
                .collect(),
            id: record.id,
            nickname: record.nickname,
            level: record.level,
            experience: record.experience,
            games_played: record.games_played,
            wins: record.wins,
            mvp_count: record.mvp_count,
            rating: record.rating,
            prestige: record.prestige,
            gold: record.gold,
            items: record.items,
            last_updated: record.last_updated,
        }
    }
}
