use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use super::history::MatchHistory;

/// Rating a player starts with.
pub const INITIAL_RATING: i64 = 1500;
/// Rating never drops below this.
pub const RATING_FLOOR: i64 = 300;
/// Flat rating swing per match.
pub const RATING_DELTA: i64 = 25;
/// Experience required per level step.
pub const XP_PER_LEVEL: i64 = 1000;

/// Derives a level from lifetime experience. Level 1 covers 0..1000,
/// level 2 covers 1000..2000, and so on.
pub fn level_for_experience(experience: i64) -> i64 {
    experience.max(0) / XP_PER_LEVEL + 1
}

/// Persistent progression record for a single player, keyed by the
/// platform account id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
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
    pub match_history: MatchHistory,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_updated: DateTime<Utc>,
}

impl PlayerRecord {
    /// Fresh record with starting progression values.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nickname: None,
            level: 1,
            experience: 0,
            games_played: 0,
            wins: 0,
            mvp_count: 0,
            rating: INITIAL_RATING,
            prestige: 0,
            gold: 0,
            items: Vec::new(),
            match_history: MatchHistory::new(),
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, Bson};
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(999, 1)]
    #[case(1000, 2)]
    #[case(1100, 2)]
    #[case(9999, 10)]
    #[case(10_000, 11)]
    #[case(-500, 1)]
    fn test_level_for_experience(#[case] experience: i64, #[case] expected: i64) {
        assert_eq!(level_for_experience(experience), expected);
    }

    #[test]
    fn test_new_record_has_starting_values() {
        let record = PlayerRecord::new("76561198000000001");

        assert_eq!(record.id, "76561198000000001");
        assert_eq!(record.nickname, None);
        assert_eq!(record.level, 1);
        assert_eq!(record.experience, 0);
        assert_eq!(record.games_played, 0);
        assert_eq!(record.wins, 0);
        assert_eq!(record.mvp_count, 0);
        assert_eq!(record.rating, INITIAL_RATING);
        assert_eq!(record.prestige, 0);
        assert_eq!(record.gold, 0);
        assert!(record.items.is_empty());
        assert!(record.match_history.is_empty());
    }

    #[test]
    fn test_stored_document_uses_camel_case_and_bson_dates() {
        let record = PlayerRecord::new("76561");
        let document = bson::to_document(&record).unwrap();

        assert!(document.contains_key("gamesPlayed"));
        assert!(document.contains_key("mvpCount"));
        assert!(document.contains_key("matchHistory"));
        assert!(matches!(
            document.get("lastUpdated"),
            Some(Bson::DateTime(_))
        ));
        // nickname stays absent until a match report supplies one
        assert!(!document.contains_key("nickname"));
    }

    #[test]
    fn test_record_decodes_from_stored_document() {
        let mut record = PlayerRecord::new("76561");
        record.nickname = Some("Invoker Main".to_string());
        record.experience = 1100;
        record.level = 2;

        let document = bson::to_document(&record).unwrap();
        let decoded: PlayerRecord = bson::from_document(document).unwrap();

        assert_eq!(decoded.id, record.id);
        assert_eq!(decoded.nickname, record.nickname);
        assert_eq!(decoded.level, 2);
        assert_eq!(decoded.experience, 1100);
    }
}
