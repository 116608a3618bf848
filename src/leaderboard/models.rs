use serde::{Deserialize, Serialize};

/// Row on the overall leaderboard, ranked by rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallEntry {
    pub id: String,
    pub nickname: Option<String>,
    pub rating: i64,
    pub games_played: i64,
    pub wins: i64,
    pub level: i64,
}

/// Row on the weekly leaderboard, ranked by wins inside the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyEntry {
    pub id: String,
    pub nickname: Option<String>,
    pub rating: i64,
    pub level: i64,
    pub weekly_games: i64,
    pub weekly_wins: i64,
}
